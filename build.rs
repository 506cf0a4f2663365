fn main() {
    // Emits ESP-IDF link arguments when building for the espidf target;
    // does nothing on host builds (no IDF sysenv present).
    embuild::espidf::sysenv::output();
}
