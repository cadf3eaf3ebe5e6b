use super::{map_quiz::MapQuiz, region_select::RegionSelect};
use crate::data::DatasetId;
use crate::util::clog;
use yew::prelude::*;

#[derive(PartialEq, Clone, Copy)]
enum View {
    Menu,
    Quiz(DatasetId),
    Daily,
}

// Provide device class context (hover accents and the gesture tip depend on it)
#[derive(Clone, Copy, PartialEq, Default)]
pub struct DeviceContext {
    pub touch: bool,
}

#[function_component(App)]
pub fn app() -> Html {
    let view = use_state(|| View::Menu);
    let touch = use_state(|| false);

    // Detect the primary input once at startup
    {
        let touch = touch.clone();
        use_effect_with((), move |_| {
            if let Some(win) = web_sys::window() {
                if let Ok(Some(mq)) = win.match_media("(pointer: coarse)") {
                    if mq.matches() {
                        touch.set(true);
                    }
                }
            }
            clog("kartquiz started");
            || ()
        });
    }

    let to_menu = {
        let view = view.clone();
        Callback::from(move |_| view.set(View::Menu))
    };
    let start_quiz = {
        let view = view.clone();
        Callback::from(move |id: DatasetId| view.set(View::Quiz(id)))
    };
    let start_daily = {
        let view = view.clone();
        Callback::from(move |_| view.set(View::Daily))
    };

    let device = DeviceContext { touch: *touch };
    let content = match *view {
        View::Menu => html! { <RegionSelect on_start={start_quiz} on_daily={start_daily} /> },
        View::Quiz(id) => html! {
            <MapQuiz dataset_id={id} daily={false} to_menu={to_menu.clone()} />
        },
        View::Daily => html! {
            <MapQuiz dataset_id={DatasetId::Europe} daily={true} to_menu={to_menu.clone()} />
        },
    };

    html! { <ContextProvider<DeviceContext> context={device}>{ content }</ContextProvider<DeviceContext>> }
}
