fn main() {
    println!("cargo::rerun-if-env-changed=XNBD_REGISTER_VERSION");
}
