use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub name: AttrValue,
    pub tagline: AttrValue,
    /// Store-local date and time; hidden until the first clock tick.
    #[prop_or_default]
    pub clock: Option<AttrValue>,
    #[prop_or_default]
    pub reseller: bool,
}

#[function_component(Header)]
pub fn header(p: &Props) -> Html {
    html! {
        <header role="banner">
            <a href="#main" class="sr-only">{ "Skip to content" }</a>
            <div class="header-content">
                <div class="header-left">
                    <h1 class="store-name">{ p.name.clone() }</h1>
                    <p class="store-tagline">{ p.tagline.clone() }</p>
                </div>
                <div class="header-right">
                    if p.reseller {
                        <span class="reseller-chip">{ "Reseller" }</span>
                    }
                    { p.clock.as_ref().map(|clock| html! {
                        <time id="store-clock" class="store-clock">{ clock.clone() }</time>
                    }).unwrap_or_default() }
                </div>
            </div>
        </header>
    }
}
