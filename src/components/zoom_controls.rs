use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ZoomControlsProps {
    pub zoom_percent: u32,
    pub zoom_in_disabled: bool,
    pub zoom_out_disabled: bool,
    /// Device-specific gesture tip shown under the buttons.
    pub tip: AttrValue,
    pub on_zoom_in: Callback<()>,
    pub on_zoom_out: Callback<()>,
    pub on_reset: Callback<()>,
}

#[function_component(ZoomControls)]
pub fn zoom_controls(props: &ZoomControlsProps) -> Html {
    let zi = {
        let cb = props.on_zoom_in.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let zo = {
        let cb = props.on_zoom_out.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let rz = {
        let cb = props.on_reset.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div style="display:flex; flex-direction:column; gap:4px; align-items:center; margin-top:8px;">
            <div style="display:flex; gap:6px;">
                <button onclick={zi} disabled={props.zoom_in_disabled}>{"Zooma in"}</button>
                <button onclick={zo} disabled={props.zoom_out_disabled}>{"Zooma ut"}</button>
                <button onclick={rz}>{"Återställ"}</button>
            </div>
            <div style="color:#8b949e; font-size:13px;">{ format!("Tips: {}", props.tip) }</div>
            <div style="color:#8b949e; font-size:13px;">{ format!("Zoom: {}%", props.zoom_percent) }</div>
        </div>
    }
}
