use living_room::{RoomConfig, run};

fn main() -> anyhow::Result<()> {
    run(RoomConfig::default())
}
