use nodepatch_core::{PatchFormat, PatchOptions, Status, SubmitPolicy, Value};

#[test]
fn nodepatch_core_readme_example() -> Result<(), Box<dyn std::error::Error>> {
    let stored = Value::from_json_str(r#"{"properties":{"cpus":8}}"#)?;
    let edited = Value::from_json_str(r#"{"properties":{"cpus":16}}"#)?;

    let result = stored.patch_to(&edited, &PatchOptions::default());
    assert_eq!(result.status, Status::Ok);

    let json_patch = result.render_patch(PatchFormat::Strict)?;
    println!("{json_patch}");
    assert_eq!(json_patch, r#"[{"op":"replace","path":"/properties/cpus","value":16}]"#);
    Ok(())
}

#[test]
fn readme_unrecognized_values_block_submission() -> Result<(), Box<dyn std::error::Error>> {
    let stored = Value::from_json_str(r#"{"maintenance":false}"#)?;
    let edited = Value::from_json_str(r#"{"maintenance":true}"#)?;

    let result = stored.patch_to(&edited, &PatchOptions::default());
    assert_eq!(result.status, Status::Error);
    assert!(result.submittable(SubmitPolicy::RequireOk).is_err());
    assert!(result.submittable(SubmitPolicy::AllowPartial)?.is_empty());
    Ok(())
}
