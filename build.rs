fn main() {
    // ESP-IDF link arguments are only needed for flash builds; host test
    // builds run without the `espidf` feature and have nothing to emit.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
