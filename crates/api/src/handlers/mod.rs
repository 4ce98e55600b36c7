pub mod character;
pub mod plot_element;
pub mod project;
pub mod timeline;
pub mod world_setting;
