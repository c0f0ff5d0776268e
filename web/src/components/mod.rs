pub mod guard;
pub mod loading;
pub mod nav;
pub mod notice;
