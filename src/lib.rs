//! Touch UI and frame loop of a minimal audio player, plus the protocol it
//! uses to steer the playback thread.

pub mod actions;
pub mod cli;
pub mod config;
pub mod coordination;
pub mod dispatch;
pub mod frame_rate;
pub mod geometry;
pub mod logging;
pub mod model;
pub mod playback;
pub mod render_drawing;
pub mod scene;
pub mod session;
pub mod text_fit;
pub mod track_list;
pub mod ui;
