//! Project management commands.

use co2_core::client::ApiClient;
use co2_core::project::{Project, ProjectFormData};
use co2_utils::dates::format_timestamp;
use log::info;
use std::io::Write;

/// Write `projects` as `id,name,tags,last_updated` CSV, tags joined by `;`.
pub fn write_projects_csv<W: Write>(projects: &[Project], writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["id", "name", "tags", "last_updated"])?;
    for project in projects {
        let updated = project
            .last_updated
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default();
        wtr.write_record([
            project.id.to_string(),
            project.name.clone(),
            project.tag_names().join(";"),
            updated,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub async fn run_list(client: &ApiClient) -> anyhow::Result<()> {
    let projects = client.list_projects().await?;
    info!("Fetched {} projects", projects.len());
    write_projects_csv(&projects, std::io::stdout().lock())
}

pub async fn run_show(client: &ApiClient, id: u64) -> anyhow::Result<()> {
    let detail = client.get_project(id).await?;
    println!("{}", serde_json::to_string_pretty(&detail)?);
    Ok(())
}

pub async fn run_create(
    client: &ApiClient,
    name: String,
    description: String,
    tags: Vec<String>,
) -> anyhow::Result<()> {
    let project = client
        .create_project(&ProjectFormData {
            name,
            description,
            tags,
        })
        .await?;
    info!("Created project {} ({})", project.name, project.id);
    println!("{}", project.id);
    Ok(())
}

pub async fn run_update(
    client: &ApiClient,
    id: u64,
    name: String,
    description: String,
    tags: Vec<String>,
) -> anyhow::Result<()> {
    let project = client
        .update_project(
            id,
            &ProjectFormData {
                name,
                description,
                tags,
            },
        )
        .await?;
    info!("Updated project {} ({})", project.name, project.id);
    Ok(())
}

pub async fn run_delete(client: &ApiClient, id: u64) -> anyhow::Result<()> {
    client.delete_project(id).await?;
    info!("Deleted project {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STR_PROJECTS: &str = r#"[
        {"id": 3, "name": "Checkout", "tags": [{"id": 1, "name": "shop"}, {"id": 7, "name": "payments"}],
         "lastUpdated": "2024-07-20T17:12:45.120Z"},
        {"id": 4, "name": "Search, v2"}
    ]"#;

    #[test]
    fn test_write_projects_csv() {
        let projects: Vec<Project> = serde_json::from_str(STR_PROJECTS).unwrap();
        let mut out = Vec::new();
        write_projects_csv(&projects, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,name,tags,last_updated\n\
             3,Checkout,shop;payments,2024-07-20T17:12:45.120Z\n\
             4,\"Search, v2\",,\n"
        );
    }
}
