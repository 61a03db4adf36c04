//! State containers, local persistence and the network worker behind the
//! sportszone terminal UI.

pub mod state;
