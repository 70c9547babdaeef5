/// Backend submodules for remote calls and the push channel
///
/// - `handlers`: dispatches `BackendAction`s onto async tasks
/// - `main_loop`: runtime setup and the UI polling loop
mod handlers;
mod main_loop;

pub use handlers::Backend;
pub use main_loop::run_backend;
