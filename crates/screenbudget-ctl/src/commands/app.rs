use anyhow::Result;
use screenbudget_common::NewMonitoredApp;
use uuid::Uuid;

pub async fn list(user: &str) -> Result<()> {
    let ctx = super::context().await?;

    let apps = ctx.ledger.list_apps(user).await?;
    if apps.is_empty() {
        println!("No monitored apps for user {}", user);
        return Ok(());
    }

    println!("Monitored apps for {}:", user);
    for app in apps {
        println!(
            "  {}  {} ({})  limit {} min/day",
            app.id, app.app_name, app.package_name, app.daily_limit_minutes
        );
    }

    Ok(())
}

pub async fn add(user: &str, package: &str, name: &str, limit: i64) -> Result<()> {
    let ctx = super::context().await?;

    let app = ctx
        .ledger
        .add_app(NewMonitoredApp {
            user_id: user.to_string(),
            package_name: package.to_string(),
            app_name: name.to_string(),
            daily_limit_minutes: limit,
        })
        .await?;

    println!("Monitoring {} ({}) with a {} minute daily limit", app.app_name, app.id, limit);
    Ok(())
}

pub async fn remove(app_id: Uuid) -> Result<()> {
    let ctx = super::context().await?;

    ctx.ledger.remove_app(app_id).await?;
    println!("Stopped monitoring {}", app_id);
    Ok(())
}
