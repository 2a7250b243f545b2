use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let protos = ["./proto/operations.proto"];

    for p in &protos {
        println!("cargo:rerun-if-changed={}", p);
    }
    println!("cargo:rerun-if-changed=build.rs");

    let mut config = tonic_prost_build::Config::new();
    if std::env::var_os("PROTOC").is_none() {
        config.protoc_executable(protoc_bin_vendored::protoc_bin_path()?);
    }

    tonic_prost_build::configure().compile_with_config(config, &protos, &["./proto"])?;

    Ok(())
}
