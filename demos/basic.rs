use waste2meals_http::{BatchDefinitionFilter, Waste2MealsClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = Waste2MealsClient::from_env().map_err(anyhow::Error::msg)?;

    let filter = BatchDefinitionFilter {
        tag: Some("bakery".to_owned()),
        max_price: Some(5.0),
        ..BatchDefinitionFilter::default()
    };

    for definition in client.batch_definitions().list(&filter).await? {
        println!(
            "#{} {} ({:.2} -> {:.2}) pickup {}-{}",
            definition.id,
            definition.description,
            definition.original_price,
            definition.discount_price,
            definition.pickup_start_time,
            definition.pickup_end_time
        );
    }

    Ok(())
}
