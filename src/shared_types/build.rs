use anyhow::Result;
use crux_core::typegen::TypeGen;
use smarthome_ui_core::{
    commands::{realtime::RealtimeOutput, timer::TimerOutput},
    events::{ChatEvent, LightEvent, RealtimeEvent, UiEvent},
    types::{ConnectionState, LightSource, Sender, Severity},
    App,
};
use std::path::PathBuf;

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=../app");

    let mut gen = TypeGen::new();

    gen.register_app::<App>()?;

    // Explicitly register domain event enums to ensure all variants are traced
    gen.register_type::<LightEvent>()?;
    gen.register_type::<ChatEvent>()?;
    gen.register_type::<RealtimeEvent>()?;
    gen.register_type::<UiEvent>()?;

    // Explicitly register other enums to ensure all variants are traced
    gen.register_type::<LightSource>()?;
    gen.register_type::<Severity>()?;
    gen.register_type::<Sender>()?;
    gen.register_type::<ConnectionState>()?;
    gen.register_type::<RealtimeOutput>()?;
    gen.register_type::<TimerOutput>()?;

    let output_root = PathBuf::from("./generated");

    gen.typescript("shared_types", output_root.join("typescript"))?;

    Ok(())
}
