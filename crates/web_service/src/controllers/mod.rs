pub mod model_controller;
pub mod settings_controller;
pub mod system_controller;
pub mod title_controller;
pub mod user_controller;
