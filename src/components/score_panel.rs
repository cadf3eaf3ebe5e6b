use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ScorePanelProps {
    /// Name of the region to find, or a placeholder while loading.
    pub prompt: AttrValue,
    pub score: u32,
    pub total: usize,
    pub skip_disabled: bool,
    pub on_skip: Callback<()>,
}

#[function_component(ScorePanel)]
pub fn score_panel(props: &ScorePanelProps) -> Html {
    let skip = {
        let cb = props.on_skip.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div style="display:flex; flex-direction:column; align-items:center; gap:4px; margin-bottom:8px;">
            <h3 style="margin:0;">{ props.prompt.clone() }</h3>
            <div style="color:#8b949e;">{ format!("Poäng: {}/{}", props.score, props.total) }</div>
            <button onclick={skip} disabled={props.skip_disabled}>{"Hoppa över"}</button>
        </div>
    }
}
