use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub banners: Vec<AttrValue>,
    pub current: usize,
    pub on_prev: Callback<()>,
    pub on_next: Callback<()>,
    pub on_select: Callback<usize>,
}

#[function_component(BannerCarousel)]
pub fn banner_carousel(p: &Props) -> Html {
    if p.banners.is_empty() {
        return Html::default();
    }
    let total = p.banners.len();
    let prev = {
        let cb = p.on_prev.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let next = {
        let cb = p.on_next.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <section class="banner-carousel" aria-roledescription="carousel" aria-label="Promotions">
            <div class="banner-track">
                { for p.banners.iter().enumerate().map(|(idx, src)| {
                    let active = idx == p.current;
                    html! {
                        <div
                            class={classes!("banner-slide", active.then_some("is-active"))}
                            aria-hidden={(!active).then(|| AttrValue::from("true"))}
                        >
                            <img src={src.clone()} alt={format!("Promotion {} of {total}", idx + 1)} />
                        </div>
                    }
                }) }
            </div>
            if total > 1 {
                <button type="button" class="banner-nav banner-prev" aria-label="Previous banner" onclick={prev}>{ "‹" }</button>
                <button type="button" class="banner-nav banner-next" aria-label="Next banner" onclick={next}>{ "›" }</button>
                <div class="banner-dots" role="tablist">
                    { for (0..total).map(|idx| {
                        let cb = p.on_select.clone();
                        let onclick = Callback::from(move |_| cb.emit(idx));
                        let active = idx == p.current;
                        html! {
                            <button
                                type="button"
                                role="tab"
                                class={classes!("banner-dot", active.then_some("is-active"))}
                                aria-selected={active.to_string()}
                                aria-label={format!("Show banner {}", idx + 1)}
                                {onclick}
                            />
                        }
                    }) }
                </div>
            }
        </section>
    }
}
