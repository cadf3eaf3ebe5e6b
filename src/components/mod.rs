pub mod app;
pub mod game_over_overlay;
pub mod map_quiz;
pub mod region_select;
pub mod score_panel;
pub mod zoom_controls;
