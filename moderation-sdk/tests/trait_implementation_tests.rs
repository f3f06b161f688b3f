use moderation_sdk::client::ModerationClient;
use moderation_sdk::openai::OpenAIModerationClient;

#[test]
fn test_openai_client_implements_trait() {
    fn assert_implements_trait<T: ModerationClient>() {}

    assert_implements_trait::<OpenAIModerationClient>();
}

#[test]
fn test_trait_object_usage() {
    let client: Box<dyn ModerationClient> =
        Box::new(OpenAIModerationClient::new("test-key").unwrap());
    assert_eq!(client.provider_name(), "openai");
}

#[test]
fn test_custom_model_name() {
    let client = OpenAIModerationClient::new("test-key")
        .unwrap()
        .with_model("text-moderation-latest");
    assert_eq!(client.model_name(), "text-moderation-latest");
}
