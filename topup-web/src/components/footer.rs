use topup_core::config::ContactLink;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub name: AttrValue,
    #[prop_or_default]
    pub contact: Vec<ContactLink>,
}

#[function_component(Footer)]
pub fn footer(p: &Props) -> Html {
    html! {
        <footer>
            if !p.contact.is_empty() {
                <nav aria-label="Contact" class="footer-contact">
                    { for p.contact.iter().map(|link| html! {
                        <a href={link.url.clone()} target="_blank" rel="noopener noreferrer">
                            { link.label.clone() }
                        </a>
                    }) }
                </nav>
            }
            <p class="footer-copy">{ format!("© {}. All rights reserved.", p.name) }</p>
        </footer>
    }
}
