use yew::prelude::*;

use crate::data::DatasetId;

#[derive(Properties, PartialEq, Clone)]
pub struct RegionSelectProps {
    pub on_start: Callback<DatasetId>,
    pub on_daily: Callback<()>,
}

#[function_component(RegionSelect)]
pub fn region_select(props: &RegionSelectProps) -> Html {
    let quiz_buttons = DatasetId::ALL
        .iter()
        .map(|id| {
            let id = *id;
            let on_start = props.on_start.clone();
            let onclick = Callback::from(move |_| on_start.emit(id));
            html! {
                <button key={id.title()} onclick={onclick} style="min-width:240px; padding:10px 16px; font-size:16px;">
                    { format!("{} {}", id.emoji(), id.title()) }
                </button>
            }
        })
        .collect::<Html>();
    let daily = {
        let cb = props.on_daily.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div style="min-height:100vh; display:flex; flex-direction:column; align-items:center; justify-content:center; gap:12px; background:#0d1117; color:#c9d1d9;">
            <h1 style="margin:0;">{"Kartquiz"}</h1>
            <p style="margin:0 0 16px 0; color:#8b949e;">{"Hitta regionerna på kartan."}</p>
            { quiz_buttons }
            <button onclick={daily} style="min-width:240px; padding:10px 16px; font-size:16px; border:1px solid #58a6ff;">
                {"🗓️ Dagens utmaning"}
            </button>
        </div>
    }
}
