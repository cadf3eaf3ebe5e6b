mod components;
mod daily;
mod data;
mod model;
mod state;
mod util;

use components::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
