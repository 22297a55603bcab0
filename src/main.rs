use plot_mover::MoverError;
use plot_mover::output as out;

mod app;
mod logging;

fn main() {
    if let Err(e) = app::run() {
        out::print_error(&format!("{e:#}"));
        let code = e.downcast_ref::<MoverError>().map_or(1, MoverError::code);
        std::process::exit(code);
    }
}
