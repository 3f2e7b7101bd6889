use anyhow::Result;
use latchkey::app::App;

fn main() -> Result<()> {
    App::init()?.execute()
}
