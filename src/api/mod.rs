pub mod central;
pub mod characteristic;
pub mod descriptor;
pub mod dialogs;
pub mod service;
