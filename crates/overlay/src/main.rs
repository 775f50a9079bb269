use pager_overlay::gui::app::AppModel;
use pager_overlay::session::Session;
use pager_overlay::sys::runtime;
use relm4::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let session = Session::load()?;

    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(tx);

    let app = RelmApp::new("org.pager.overlay");

    app.run::<AppModel>((session, rx));
    Ok(())
}
