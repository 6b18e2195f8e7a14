use lambda_runtime::{service_fn, Error, LambdaEvent};
use product_api_lambda::adapters::dynamodb::DynamoDbProductStore;
use product_api_lambda::handlers::api::handle_api_event;
use product_api_lambda::runtime::contract::ApiGatewayResponse;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let table_name = std::env::var("PRODUCT_TABLE_NAME")
        .map_err(|_| Error::from("PRODUCT_TABLE_NAME must be configured"))?;

    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = DynamoDbProductStore::new(aws_sdk_dynamodb::Client::new(&config), table_name);

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| {
        let store = &store;
        async move { Ok::<ApiGatewayResponse, Error>(handle_api_event(event.payload, store)) }
    }))
    .await
}
