//! Dismissible promotional overlays.
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct PopupProps {
    pub open: bool,
    pub image: AttrValue,
    #[prop_or_default]
    pub link: Option<AttrValue>,
    pub on_close: Callback<()>,
}

#[function_component(PopupBanner)]
pub fn popup_banner(p: &PopupProps) -> Html {
    if !p.open || p.image.is_empty() {
        return Html::default();
    }
    let on_close = {
        let cb = p.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let image = html! { <img src={p.image.clone()} alt="Promotion" /> };
    html! {
        <div class="popup-banner" role="dialog" aria-label="Promotion">
            <button type="button" class="popup-close" aria-label="Close promotion" onclick={on_close}>{ "X" }</button>
            { match p.link.as_ref() {
                Some(href) => html! { <a href={href.clone()} target="_blank" rel="noopener noreferrer">{ image }</a> },
                None => image,
            } }
        </div>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct ToastProps {
    pub open: bool,
    pub message: AttrValue,
    pub on_close: Callback<()>,
}

#[function_component(PromoToast)]
pub fn promo_toast(p: &ToastProps) -> Html {
    if !p.open || p.message.is_empty() {
        return Html::default();
    }
    let on_close = {
        let cb = p.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div class="promo-toast" role="status">
            <span>{ p.message.clone() }</span>
            <button type="button" class="toast-close" aria-label="Dismiss" onclick={on_close}>{ "X" }</button>
        </div>
    }
}
