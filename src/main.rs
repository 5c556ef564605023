//! Blood Donation Backend - binary entry point
//! Delegates to the library for all app logic.

#[tokio::main]
async fn main() {
    if blood_donation_backend::run().await.is_err() {
        std::process::exit(1);
    }
}
