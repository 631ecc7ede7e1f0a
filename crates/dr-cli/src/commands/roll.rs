use dr_core::{Evaluator, RelayConfig, normalize};

pub async fn run(server: &str, command: &str, system: Option<&str>) -> Result<(), String> {
    let config = RelayConfig::from_env(server);
    let client = super::client(&config);
    if let Some(system) = system {
        client.set_system(system, None);
    }

    let result = client
        .roll(&normalize(command))
        .await
        .map_err(|e| e.to_string())?;
    if result.error {
        return Err(result.text);
    }
    if !result.rolled {
        return Err(format!("'{command}' was not rolled"));
    }
    println!("{}{}", result.system, result.text);
    Ok(())
}
