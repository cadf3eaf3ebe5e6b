use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event, HtmlElement, MouseEvent, TouchEvent, WheelEvent};
use yew::prelude::*;

use super::app::DeviceContext;
use super::{
    game_over_overlay::GameOverOverlay, score_panel::ScorePanel, zoom_controls::ZoomControls,
};
use crate::daily::{daily_order, random_order, stockholm_today};
use crate::data::{Dataset, DatasetId};
use crate::model::{QuizAction, QuizState, SKIP_REVEAL_MS, WRONG_FLASH_MS};
use crate::state::viewport::{MAX_ZOOM, MIN_ZOOM, RELEASE_CLEAR_MS, WHEEL_IDLE_MS, help_text};
use crate::state::{MapViewport, Point, ViewSnapshot};
use crate::util::{clog, element_rect, touches_to_contacts};

/// Side of one grid cell in SVG user units.
const CELL: f64 = 40.0;

const PULSE_CSS: &str = "
.region:hover { fill: #F53; }
.region:active { fill: #E42; }
.pulse { animation: pulse-red 1s infinite; }
@keyframes pulse-red {
  0% { fill: #FF0000; }
  50% { fill: #D6D6DA; }
  100% { fill: #FF0000; }
}
";

type TimerSlot = Rc<RefCell<Option<(i32, Closure<dyn FnMut()>)>>>;

fn clear_timer(slot: &TimerSlot) {
    if let Some((id, _cb)) = slot.borrow_mut().take() {
        if let Some(win) = web_sys::window() {
            win.clear_timeout_with_handle(id);
        }
    }
}

/// Replaces whatever the slot held, cancelling the old timeout first.
fn schedule_timer(slot: &TimerSlot, delay_ms: i32, f: impl FnMut() + 'static) {
    clear_timer(slot);
    let cb = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
    if let Some(win) = web_sys::window() {
        if let Ok(id) = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                delay_ms,
            )
        {
            *slot.borrow_mut() = Some((id, cb));
        }
    }
}

fn load_dataset(id: DatasetId) -> Dataset {
    match id.load() {
        Ok(dataset) => {
            clog(&format!("dataset loaded: {} regions", dataset.regions.len()));
            dataset
        }
        Err(err) => {
            clog(&format!("dataset load failed: {err}"));
            Dataset::empty()
        }
    }
}

fn new_order(region_count: usize, daily: bool) -> Vec<usize> {
    if daily {
        let (year, month, day) = stockholm_today();
        daily_order(region_count, year, month, day)
    } else {
        random_order(region_count)
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct MapQuizProps {
    pub dataset_id: DatasetId,
    pub daily: bool,
    pub to_menu: Callback<()>,
}

#[function_component(MapQuiz)]
pub fn map_quiz(props: &MapQuizProps) -> Html {
    let device = use_context::<DeviceContext>().unwrap_or_default();
    let dataset = use_state(|| load_dataset(props.dataset_id));
    let daily = props.daily;
    let quiz = {
        let dataset = dataset.clone();
        use_reducer(move || QuizState::new(new_order(dataset.regions.len(), daily)))
    };
    let viewport = use_mut_ref(MapViewport::new);
    let view = use_state_eq(ViewSnapshot::default);
    let container_ref = use_node_ref();
    let release_timer = use_mut_ref(|| None::<(i32, Closure<dyn FnMut()>)>);
    let wheel_timer = use_mut_ref(|| None::<(i32, Closure<dyn FnMut()>)>);
    let dismissed = use_state(|| false);

    // Main mount effect: manual listeners on the map container. Wheel and
    // touchmove must be non-passive so prevent_default sticks.
    {
        let container_ref = container_ref.clone();
        let viewport = viewport.clone();
        let view = view.clone();
        let release_timer = release_timer.clone();
        let wheel_timer = wheel_timer.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window");
            let container: HtmlElement =
                container_ref.cast::<HtmlElement>().expect("map container");
            {
                let mut vp = viewport.borrow_mut();
                vp.set_rect(element_rect(&container));
            }
            let snap = viewport.borrow().snapshot();
            view.set(snap);
            clog("map view mounted");

            // Wheel zoom
            let wheel_cb = {
                let viewport = viewport.clone();
                let view = view.clone();
                let wheel_timer = wheel_timer.clone();
                let container = container.clone();
                Closure::wrap(Box::new(move |e: WheelEvent| {
                    e.prevent_default();
                    e.stop_propagation();
                    {
                        let mut vp = viewport.borrow_mut();
                        vp.set_rect(element_rect(&container));
                        vp.wheel_zoom(
                            Point::new(f64::from(e.client_x()), f64::from(e.client_y())),
                            e.delta_y(),
                        );
                    }
                    let snap = viewport.borrow().snapshot();
                    view.set(snap);
                    let viewport2 = viewport.clone();
                    let view2 = view.clone();
                    schedule_timer(&wheel_timer, WHEEL_IDLE_MS, move || {
                        viewport2.borrow_mut().finish_wheel_idle();
                        let snap = viewport2.borrow().snapshot();
                        view2.set(snap);
                    });
                }) as Box<dyn FnMut(_)>)
            };
            let wheel_opts = AddEventListenerOptions::new();
            wheel_opts.set_passive(false);
            container
                .add_event_listener_with_callback_and_add_event_listener_options(
                    "wheel",
                    wheel_cb.as_ref().unchecked_ref(),
                    &wheel_opts,
                )
                .unwrap();

            // Mouse events
            let mousedown_cb = {
                let viewport = viewport.clone();
                let view = view.clone();
                let release_timer = release_timer.clone();
                let container = container.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    if e.button() != 0 {
                        return;
                    }
                    let engaged;
                    {
                        let mut vp = viewport.borrow_mut();
                        vp.set_rect(element_rect(&container));
                        vp.begin_drag(Point::new(
                            f64::from(e.client_x()),
                            f64::from(e.client_y()),
                        ));
                        engaged = vp.is_dragging();
                    }
                    if engaged {
                        clear_timer(&release_timer);
                    }
                    let snap = viewport.borrow().snapshot();
                    view.set(snap);
                }) as Box<dyn FnMut(_)>)
            };
            container
                .add_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                )
                .unwrap();
            let mousemove_cb = {
                let viewport = viewport.clone();
                let view = view.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    {
                        let mut vp = viewport.borrow_mut();
                        if !vp.is_dragging() {
                            return;
                        }
                        vp.drag_to(Point::new(f64::from(e.client_x()), f64::from(e.client_y())));
                    }
                    let snap = viewport.borrow().snapshot();
                    view.set(snap);
                }) as Box<dyn FnMut(_)>)
            };
            container
                .add_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                )
                .unwrap();
            // Release is window-level so drags that leave the container still end.
            let mouseup_cb = {
                let viewport = viewport.clone();
                let view = view.clone();
                let release_timer = release_timer.clone();
                Closure::wrap(Box::new(move |_e: MouseEvent| {
                    viewport.borrow_mut().end_drag();
                    let snap = viewport.borrow().snapshot();
                    view.set(snap);
                    let viewport2 = viewport.clone();
                    let view2 = view.clone();
                    schedule_timer(&release_timer, RELEASE_CLEAR_MS, move || {
                        viewport2.borrow_mut().finish_release();
                        let snap = viewport2.borrow().snapshot();
                        view2.set(snap);
                    });
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref())
                .unwrap();

            // Touch
            let touchstart_cb = {
                let viewport = viewport.clone();
                let view = view.clone();
                let release_timer = release_timer.clone();
                let container = container.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    let contacts = touches_to_contacts(&e.touches());
                    let engaged;
                    {
                        let mut vp = viewport.borrow_mut();
                        vp.set_rect(element_rect(&container));
                        vp.touch_start(&contacts);
                        engaged = vp.is_dragging() || vp.is_pinching();
                    }
                    if engaged {
                        clear_timer(&release_timer);
                    }
                    let snap = viewport.borrow().snapshot();
                    view.set(snap);
                }) as Box<dyn FnMut(_)>)
            };
            container
                .add_event_listener_with_callback(
                    "touchstart",
                    touchstart_cb.as_ref().unchecked_ref(),
                )
                .ok();
            let touchmove_cb = {
                let viewport = viewport.clone();
                let view = view.clone();
                let container = container.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    let contacts = touches_to_contacts(&e.touches());
                    {
                        let mut vp = viewport.borrow_mut();
                        if contacts.len() >= 2 || vp.is_dragging() {
                            e.prevent_default();
                        }
                        vp.set_rect(element_rect(&container));
                        vp.touch_move(&contacts);
                    }
                    let snap = viewport.borrow().snapshot();
                    view.set(snap);
                }) as Box<dyn FnMut(_)>)
            };
            let touchmove_opts = AddEventListenerOptions::new();
            touchmove_opts.set_passive(false);
            container
                .add_event_listener_with_callback_and_add_event_listener_options(
                    "touchmove",
                    touchmove_cb.as_ref().unchecked_ref(),
                    &touchmove_opts,
                )
                .ok();
            let touchend_cb = {
                let viewport = viewport.clone();
                let view = view.clone();
                let release_timer = release_timer.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    let remaining = touches_to_contacts(&e.touches());
                    viewport.borrow_mut().touch_end(&remaining);
                    let snap = viewport.borrow().snapshot();
                    view.set(snap);
                    if remaining.is_empty() {
                        let viewport2 = viewport.clone();
                        let view2 = view.clone();
                        schedule_timer(&release_timer, RELEASE_CLEAR_MS, move || {
                            viewport2.borrow_mut().finish_release();
                            let snap = viewport2.borrow().snapshot();
                            view2.set(snap);
                        });
                    }
                }) as Box<dyn FnMut(_)>)
            };
            container
                .add_event_listener_with_callback("touchend", touchend_cb.as_ref().unchecked_ref())
                .ok();
            container
                .add_event_listener_with_callback(
                    "touchcancel",
                    touchend_cb.as_ref().unchecked_ref(),
                )
                .ok();

            // Keep the measured rect fresh across window resizes.
            let resize_cb = {
                let viewport = viewport.clone();
                let view = view.clone();
                let container = container.clone();
                Closure::wrap(Box::new(move |_e: Event| {
                    viewport.borrow_mut().set_rect(element_rect(&container));
                    let snap = viewport.borrow().snapshot();
                    view.set(snap);
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
                .unwrap();

            // Cleanup
            let window_clone = window.clone();
            move || {
                let _ = container.remove_event_listener_with_callback(
                    "wheel",
                    wheel_cb.as_ref().unchecked_ref(),
                );
                let _ = container.remove_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                );
                let _ = container.remove_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = container.remove_event_listener_with_callback(
                    "touchstart",
                    touchstart_cb.as_ref().unchecked_ref(),
                );
                let _ = container.remove_event_listener_with_callback(
                    "touchmove",
                    touchmove_cb.as_ref().unchecked_ref(),
                );
                let _ = container.remove_event_listener_with_callback(
                    "touchend",
                    touchend_cb.as_ref().unchecked_ref(),
                );
                let _ = container.remove_event_listener_with_callback(
                    "touchcancel",
                    touchend_cb.as_ref().unchecked_ref(),
                );
                let _ = window_clone.remove_event_listener_with_callback(
                    "mouseup",
                    mouseup_cb.as_ref().unchecked_ref(),
                );
                let _ = window_clone.remove_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                clear_timer(&release_timer);
                clear_timer(&wheel_timer);
                let _keep_alive = (
                    &wheel_cb,
                    &mousedown_cb,
                    &mousemove_cb,
                    &mouseup_cb,
                    &touchstart_cb,
                    &touchmove_cb,
                    &touchend_cb,
                    &resize_cb,
                );
            }
        });
    }

    // Wrong-guess toast: clears itself after a fixed delay; a newer wrong
    // guess on a different region restarts the delay.
    {
        let quiz = quiz.clone();
        use_effect_with(quiz.wrong_flash, move |flash| {
            let mut pending = None;
            if flash.is_some() {
                let quiz2 = quiz.clone();
                let cb = Closure::wrap(Box::new(move || {
                    quiz2.dispatch(QuizAction::ClearWrongFlash);
                }) as Box<dyn FnMut()>);
                if let Some(win) = web_sys::window() {
                    if let Ok(id) = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                        cb.as_ref().unchecked_ref(),
                        WRONG_FLASH_MS,
                    ) {
                        pending = Some((id, cb));
                    }
                }
            }
            move || {
                if let Some((id, _cb)) = pending {
                    if let Some(win) = web_sys::window() {
                        win.clear_timeout_with_handle(id);
                    }
                }
            }
        });
    }

    // Skip reveal: pulse for a fixed delay, then advance.
    {
        let quiz = quiz.clone();
        use_effect_with(quiz.skip_pulse, move |pulse| {
            let mut pending = None;
            if pulse.is_some() {
                let quiz2 = quiz.clone();
                let cb = Closure::wrap(Box::new(move || {
                    quiz2.dispatch(QuizAction::FinishSkip);
                }) as Box<dyn FnMut()>);
                if let Some(win) = web_sys::window() {
                    if let Ok(id) = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                        cb.as_ref().unchecked_ref(),
                        SKIP_REVEAL_MS,
                    ) {
                        pending = Some((id, cb));
                    }
                }
            }
            move || {
                if let Some((id, _cb)) = pending {
                    if let Some(win) = web_sys::window() {
                        win.clear_timeout_with_handle(id);
                    }
                }
            }
        });
    }

    // A finished round logs once; a restarted round re-arms the overlay.
    {
        let dismissed = dismissed.clone();
        let score = quiz.score;
        let total = quiz.total();
        use_effect_with(quiz.game_over, move |game_over| {
            if *game_over {
                clog(&format!("round finished: {score}/{total}"));
            } else if *dismissed {
                dismissed.set(false);
            }
            || ()
        });
    }

    let snapshot = *view;

    let on_zoom_in = {
        let viewport = viewport.clone();
        let view = view.clone();
        Callback::from(move |_| {
            viewport.borrow_mut().zoom_in();
            let snap = viewport.borrow().snapshot();
            view.set(snap);
        })
    };
    let on_zoom_out = {
        let viewport = viewport.clone();
        let view = view.clone();
        Callback::from(move |_| {
            viewport.borrow_mut().zoom_out();
            let snap = viewport.borrow().snapshot();
            view.set(snap);
        })
    };
    let on_reset = {
        let viewport = viewport.clone();
        let view = view.clone();
        Callback::from(move |_| {
            viewport.borrow_mut().reset_zoom();
            let snap = viewport.borrow().snapshot();
            view.set(snap);
        })
    };
    // Guesses read the live controller, not the render snapshot, so a click
    // fired right after a drag is judged against the current gesture state.
    let on_region_click = {
        let viewport = viewport.clone();
        let quiz = quiz.clone();
        Callback::from(move |region: usize| {
            if viewport.borrow().suppress_click() {
                return;
            }
            quiz.dispatch(QuizAction::Guess { region });
        })
    };
    let on_skip = {
        let quiz = quiz.clone();
        Callback::from(move |_| quiz.dispatch(QuizAction::Skip))
    };
    let play_again = {
        let quiz = quiz.clone();
        let dataset = dataset.clone();
        let dismissed = dismissed.clone();
        Callback::from(move |_| {
            clog("new round");
            quiz.dispatch(QuizAction::Restart {
                order: new_order(dataset.regions.len(), daily),
            });
            dismissed.set(false);
        })
    };
    let close_overlay = {
        let dismissed = dismissed.clone();
        Callback::from(move |_| dismissed.set(true))
    };
    let menu_btn = {
        let cb = props.to_menu.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let title = if props.daily {
        "Dagens utmaning"
    } else {
        props.dataset_id.title()
    };
    let prompt = quiz
        .current()
        .and_then(|i| dataset.regions.get(i))
        .map(|r| r.name.clone())
        .unwrap_or_else(|| "Laddar...".to_string());
    let toast = match quiz.wrong_flash.and_then(|i| dataset.regions.get(i)) {
        Some(region) => html! {
            <div style="position:absolute; top:20%; left:50%; transform:translateX(-50%); background:rgba(0,0,0,0.7); color:#fff; padding:8px 16px; border-radius:8px; z-index:20; pointer-events:none;">
                { region.name.clone() }
            </div>
        },
        None => html! {},
    };

    let grid_w = f64::from(dataset.cols) * CELL;
    let grid_h = f64::from(dataset.rows) * CELL;
    let view_box = format!("0 0 {} {}", grid_w, grid_h);
    let region_hover = (!device.touch).then_some("region");
    let tiles = dataset
        .regions
        .iter()
        .enumerate()
        .map(|(i, region)| {
            let x = f64::from(region.col) * CELL + 2.0;
            let y = f64::from(region.row) * CELL + 2.0;
            let pulsing = quiz.skip_pulse == Some(i);
            let onclick = {
                let cb = on_region_click.clone();
                Callback::from(move |_: MouseEvent| cb.emit(i))
            };
            html! {
                <rect
                    key={region.id.clone()}
                    class={classes!(region_hover, pulsing.then_some("pulse"))}
                    x={x.to_string()}
                    y={y.to_string()}
                    width={(CELL - 4.0).to_string()}
                    height={(CELL - 4.0).to_string()}
                    rx="4"
                    fill={quiz.fill_color(i)}
                    stroke="#30363d"
                    stroke-width="1"
                    onclick={onclick}
                />
            }
        })
        .collect::<Html>();

    let container_style = format!(
        "position:relative; overflow:hidden; touch-action:none; user-select:none; width:min(92vw, 760px); aspect-ratio:{}/{}; border:2px solid #555; border-radius:8px; background:#0e1116; cursor:{};",
        dataset.cols,
        dataset.rows,
        snapshot.cursor()
    );
    let surface_style = format!("width:100%; height:100%; {}", snapshot.transform_style());

    html! {
        <div style="min-height:100vh; background:#0d1117; color:#c9d1d9; display:flex; flex-direction:column; align-items:center; padding:16px; position:relative;">
            <style>{ PULSE_CSS }</style>
            <div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px;">
                <button onclick={menu_btn}>{"Till menyn"}</button>
            </div>
            <h2 style="margin:0 0 8px 0;">{ title }</h2>
            <ScorePanel
                prompt={prompt}
                score={quiz.score}
                total={quiz.total()}
                skip_disabled={quiz.skip_pulse.is_some() || quiz.game_over}
                on_skip={on_skip}
            />
            <div ref={container_ref} style={container_style}>
                { toast }
                <div style={surface_style}>
                    <svg viewBox={view_box} style="width:100%; height:100%; display:block;">
                        { tiles }
                    </svg>
                </div>
                <GameOverOverlay
                    show={quiz.game_over && !*dismissed}
                    score={quiz.score}
                    total={quiz.total()}
                    unit={dataset.unit.clone()}
                    play_again={play_again}
                    close={close_overlay}
                />
            </div>
            <ZoomControls
                zoom_percent={snapshot.zoom_percent()}
                zoom_in_disabled={snapshot.zoom >= MAX_ZOOM}
                zoom_out_disabled={snapshot.zoom <= MIN_ZOOM}
                tip={help_text(device.touch)}
                on_zoom_in={on_zoom_in}
                on_zoom_out={on_zoom_out}
                on_reset={on_reset}
            />
        </div>
    }
}
