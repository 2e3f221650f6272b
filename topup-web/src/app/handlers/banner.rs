use crate::app::state::AppState;
use topup_core::Carousel;
use yew::prelude::*;

pub fn build_banner_next(state: &AppState) -> Callback<()> {
    let carousel = state.carousel.clone();
    Callback::from(move |()| carousel.update(Carousel::next_slide))
}

pub fn build_banner_prev(state: &AppState) -> Callback<()> {
    let carousel = state.carousel.clone();
    Callback::from(move |()| carousel.update(Carousel::prev_slide))
}

pub fn build_banner_select(state: &AppState) -> Callback<usize> {
    let carousel = state.carousel.clone();
    Callback::from(move |index: usize| {
        carousel.update(|c| c.select(index));
    })
}

/// Auto-advance tick; a no-op when rotation is switched off.
pub fn build_banner_rotate(state: &AppState) -> Callback<()> {
    let carousel = state.carousel.clone();
    let rotate = state.config.rotate_banners;
    Callback::from(move |()| {
        if rotate && carousel.with(|c| c.len() > 1) {
            carousel.update(Carousel::next_slide);
        }
    })
}

pub fn build_clock_tick(state: &AppState) -> Callback<()> {
    let now_ms = state.now_ms.clone();
    Callback::from(move |()| now_ms.set(crate::dom::now_millis()))
}

pub fn build_close_popup(state: &AppState) -> Callback<()> {
    let show = state.show_popup.clone();
    Callback::from(move |()| show.set(false))
}

pub fn build_close_promo(state: &AppState) -> Callback<()> {
    let show = state.show_promo.clone();
    Callback::from(move |()| show.set(false))
}
