use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct GameOverOverlayProps {
    pub show: bool,
    pub score: u32,
    pub total: usize,
    /// Unit word of the active dataset ("länder", "stater", "landskap").
    pub unit: AttrValue,
    pub play_again: Callback<()>,
    pub close: Callback<()>,
}

#[function_component]
pub fn GameOverOverlay(props: &GameOverOverlayProps) -> Html {
    if !props.show {
        return html! {};
    }
    let play_again_btn = {
        let cb = props.play_again.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let close_btn = {
        let cb = props.close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.85); border:2px solid #2ea043; padding:24px 32px; border-radius:12px; text-align:center; min-width:280px; z-index:30;">
            <h2 style="margin:0 0 12px 0; color:#2ea043;">{"Väl spelat!"}</h2>
            <p style="margin:4px 0;">{ format!("Du klarade {}/{} {}!", props.score, props.total, props.unit) }</p>
            <div style="margin-top:16px; display:flex; gap:12px; justify-content:center;">
                <button onclick={play_again_btn}>{"Spela igen"}</button>
                <button onclick={close_btn}>{"Stäng"}</button>
            </div>
        </div>
    }
}
