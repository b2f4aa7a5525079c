/// Prints the NUMA nodes of the running host as JSON.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug ROOTFS_MOUNT_PATH=/rootfs cargo run
/// ```
fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    numa_inventory::run()
}
