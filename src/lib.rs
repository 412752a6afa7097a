pub mod cli;
pub mod codec;
pub mod controller;
pub mod domain;
pub mod inputter;
pub mod logging;
pub mod model;
pub mod table;
pub mod ui;

pub use domain::{AppConfig, AppError, Message};
pub use model::{Model, Modus, Status};
pub use table::{AxisSelection, ChartPoint, TableError, TableModel};
