//! TypeScript bindings for the core types are generated by `build.rs`.
