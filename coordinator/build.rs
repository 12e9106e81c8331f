fn main() {
    std::env::set_var(
        "PROTOC",
        protoc_bin_vendored::protoc_bin_path().expect("Failed to locate vendored protoc binary"),
    );

    let proto_file = "../proto/coordination.proto";
    let proto_dir = "../proto";
    let out_dir = "src/proto";

    // Rerun if the proto file changes
    println!("cargo:rerun-if-changed={}", proto_file);

    // Ensure output directory exists
    std::fs::create_dir_all(out_dir).expect("Failed to create proto output directory");

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .out_dir(out_dir)
        .compile_protos(&[proto_file], &[proto_dir])
        .expect("Failed to compile coordination.proto");
}
