use newsletter_subscriptions::config::get_configuration;
use newsletter_subscriptions::startup::{Application, StartupError};
use newsletter_subscriptions::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let subscriber = get_subscriber(
        String::from("newsletter_subscriptions"),
        String::from("info"),
        std::io::stdout,
    );

    init_subscriber(subscriber);

    let config = get_configuration().expect("Missing configuration file.");
    let application = Application::build(config).await?;

    application.run_until_stop().await?;

    Ok(())
}
