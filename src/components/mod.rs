pub mod details;
pub mod force_graph;
pub mod fullscreen;
pub mod sidebar;
