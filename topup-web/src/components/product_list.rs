//! Storefront product sections.
//!
//! One section per non-empty bucket in storefront order. The diamonds section
//! is laid out as shelves (passes, plain diamond packs, the rest).
use topup_core::{BadgeTone, Bundle, BundleKind, GameId, GroupedCatalog, format_currency};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct CardProps {
    pub bundle: Bundle,
    pub selected: bool,
    pub reseller: bool,
    pub on_select: Callback<AttrValue>,
}

fn badge_icon(tone: BadgeTone) -> &'static str {
    match tone {
        BadgeTone::Hot => "🔥",
        BadgeTone::Best => "⭐",
        BadgeTone::New => "✨",
        BadgeTone::Premium => "💎",
        BadgeTone::Plain => "",
    }
}

#[function_component(ProductCard)]
pub fn product_card(p: &CardProps) -> Html {
    let bundle = &p.bundle;
    let onclick = {
        let cb = p.on_select.clone();
        let id = AttrValue::from(bundle.id.clone());
        Callback::from(move |_| cb.emit(id.clone()))
    };
    let badge = bundle.badge_label.as_ref().map(|label| {
        let tone = bundle.badge_tone().unwrap_or(BadgeTone::Plain);
        let class = format!("badge badge--{tone:?}").to_lowercase();
        html! {
            <span {class}>{ badge_icon(tone) }{ " " }{ label.clone() }</span>
        }
    });

    html! {
        <button
            type="button"
            id={format!("bundle-{}", bundle.id)}
            class={classes!("product-card", p.selected.then_some("is-selected"))}
            aria-pressed={p.selected.to_string()}
            {onclick}
        >
            { badge.unwrap_or_default() }
            { bundle.image_ref.as_ref().map(|src| html! {
                <img src={src.clone()} alt="" loading="lazy" />
            }).unwrap_or_default() }
            <span class="product-name">{ bundle.display_name.clone() }</span>
            <span class="product-price">
                { format_currency(bundle.unit_price_cents) }
                if bundle.has_discount() {
                    <s class="product-original">
                        { bundle.original_price_cents.map(format_currency).unwrap_or_default() }
                    </s>
                    <span class="product-discount">
                        { format!("(-{}%)", bundle.discount_percent.unwrap_or_default()) }
                    </span>
                }
            </span>
            if p.reseller {
                { bundle.reseller_price_cents.map(|cents| html! {
                    <span class="product-reseller">{ format!("Reseller: {}", format_currency(cents)) }</span>
                }).unwrap_or_default() }
            }
        </button>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub grouped: GroupedCatalog,
    pub game: GameId,
    #[prop_or_default]
    pub loading: bool,
    #[prop_or_default]
    pub error: Option<AttrValue>,
    #[prop_or_default]
    pub selected: Option<AttrValue>,
    #[prop_or_default]
    pub reseller: bool,
    /// Time left on today's deals, shown on the special section.
    #[prop_or_default]
    pub deals_countdown: Option<AttrValue>,
    pub on_select: Callback<AttrValue>,
}

#[function_component(ProductList)]
pub fn product_list(p: &Props) -> Html {
    if p.loading {
        return html! {
            <section id="products" class="product-list" aria-busy="true">
                <p class="muted">{ "Loading products..." }</p>
            </section>
        };
    }
    if let Some(error) = p.error.as_ref() {
        return html! {
            <section id="products" class="product-list">
                <p class="alert alert-error" role="alert">{ error.clone() }</p>
            </section>
        };
    }
    if p.grouped.is_empty() {
        return html! {
            <section id="products" class="product-list">
                <p class="muted">{ format!("No products available for {}.", p.game.display_name()) }</p>
            </section>
        };
    }

    let card = |bundle: &Bundle| {
        let selected = p.selected.as_deref() == Some(bundle.id.as_str());
        html! {
            <ProductCard
                key={bundle.id.clone()}
                bundle={bundle.clone()}
                {selected}
                reseller={p.reseller}
                on_select={p.on_select.clone()}
            />
        }
    };

    html! {
        <section id="products" class="product-list">
            { for p.grouped.iter().map(|(kind, bundles)| {
                let body = if kind == BundleKind::Diamonds {
                    let shelves = topup_core::DiamondShelves::split(bundles);
                    html! {
                        <>
                            { for shelves.iter().map(|shelf| html! {
                                <div class="product-shelf">{ for shelf.iter().map(card) }</div>
                            }) }
                        </>
                    }
                } else {
                    html! { <div class="product-shelf">{ for bundles.iter().map(card) }</div> }
                };
                html! {
                    <div class={format!("product-section product-section--{}", kind.label())}>
                        <h2>{ kind.section_title() }</h2>
                        if kind == BundleKind::Special {
                            { p.deals_countdown.as_ref().map(|left| html! {
                                <p class="deals-countdown">{ "Ends in " }<time>{ left.clone() }</time></p>
                            }).unwrap_or_default() }
                        }
                        { body }
                    </div>
                }
            }) }
        </section>
    }
}
