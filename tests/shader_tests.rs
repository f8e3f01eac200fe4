//! Validates the point-cloud shader with naga.

const POINTS_SHADER: &str = include_str!("../src/shader.wgsl");

fn parse() -> naga::Module {
    naga::front::wgsl::parse_str(POINTS_SHADER).unwrap_or_else(|e| panic!("WGSL parse error: {e:?}"))
}

#[test]
fn test_points_shader_validates() {
    let module = parse();
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .unwrap_or_else(|e| panic!("WGSL validation error: {e:?}"));
}

#[test]
fn test_points_shader_entry_points() {
    let module = parse();
    let names: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}

#[test]
fn test_uniform_block_is_144_bytes() {
    // Must match the Rust-side `Uniforms` struct
    let module = parse();
    let span = module
        .types
        .iter()
        .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
            (Some(name), naga::TypeInner::Struct { span, .. }) if name == "Uniforms" => Some(*span),
            _ => None,
        })
        .expect("Uniforms struct not found");
    assert_eq!(span, 144);
}
