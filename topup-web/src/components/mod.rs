pub mod account_form;
pub mod banner_carousel;
pub mod checkout_bar;
pub mod footer;
pub mod game_picker;
pub mod header;
pub mod modal;
pub mod payment_modal;
pub mod payment_selector;
pub mod product_list;
pub mod promo;
