use topup_core::GameId;
use topup_core::config::GameListing;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub games: Vec<GameListing>,
    pub active: GameId,
    pub on_select: Callback<GameId>,
}

#[function_component(GamePicker)]
pub fn game_picker(p: &Props) -> Html {
    html! {
        <nav class="game-picker" aria-label="Choose a game">
            { for p.games.iter().map(|listing| {
                let game = listing.game;
                let active = game == p.active;
                let onclick = {
                    let cb = p.on_select.clone();
                    Callback::from(move |_| cb.emit(game))
                };
                html! {
                    <button
                        type="button"
                        id={format!("game-{}", game.code())}
                        class={classes!("game-tile", active.then_some("is-active"))}
                        aria-pressed={active.to_string()}
                        {onclick}
                    >
                        { listing.image.as_ref().map(|src| html! {
                            <img src={src.clone()} alt="" />
                        }).unwrap_or_default() }
                        <span class="game-name">{ game.display_name() }</span>
                        { listing.badge.as_ref().map(|badge| html! {
                            <span class="game-badge">{ badge.clone() }</span>
                        }).unwrap_or_default() }
                    </button>
                }
            }) }
        </nav>
    }
}
