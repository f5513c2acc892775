mod app;
mod link;

use app::App;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut app = App::default();
    while !app.is_done() {
        app.update();
    }
    app.shutdown();
}
