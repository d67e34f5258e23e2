//! Implementation of the RemoteClient trait for InMemoryRemote.

use async_trait::async_trait;

use podio_remote::{
    App, AppConfig, AppField, AppFieldConfig, CreateAppFieldParams, CreateSpaceParams,
    Organization, RemoteClient, RemoteError, Space, UpdateSpaceParams,
};

use crate::storage::{InMemoryRemote, RemoteOperation, slugify};

const DEFAULT_PRIVACY: &str = "closed";
const DEFAULT_APP_TYPE: &str = "standard";

fn check_privacy(privacy: &str) -> Result<(), RemoteError> {
    match privacy {
        "open" | "closed" => Ok(()),
        other => Err(RemoteError::api(400, format!("invalid privacy '{other}'"))),
    }
}

/// Fills in server defaults for every attribute the request left unset.
///
/// `icon` has no server default, so an update without one clears it.
fn apply_app_defaults(config: &AppConfig, previous: Option<&AppConfig>) -> AppConfig {
    let fallback = previous.cloned().unwrap_or_else(|| AppConfig {
        app_type: Some(DEFAULT_APP_TYPE.to_string()),
        description: Some(String::new()),
        usage: Some(String::new()),
        allow_edit: Some(true),
        allow_attachments: Some(true),
        allow_comments: Some(true),
        silent_creates: Some(false),
        silent_edits: Some(false),
        ..AppConfig::default()
    });

    AppConfig {
        name: config.name.clone(),
        app_type: config.app_type.clone().or(fallback.app_type),
        item_name: config.item_name.clone(),
        description: config.description.clone().or(fallback.description),
        usage: config.usage.clone().or(fallback.usage),
        icon: config.icon.clone(),
        allow_edit: config.allow_edit.or(fallback.allow_edit),
        allow_attachments: config.allow_attachments.or(fallback.allow_attachments),
        allow_comments: config.allow_comments.or(fallback.allow_comments),
        silent_creates: config.silent_creates.or(fallback.silent_creates),
        silent_edits: config.silent_edits.or(fallback.silent_edits),
    }
}

fn apply_field_defaults(config: &AppFieldConfig, previous: &AppFieldConfig) -> AppFieldConfig {
    AppFieldConfig {
        label: config.label.clone(),
        description: config.description.clone().or(previous.description.clone()),
        required: config.required.or(previous.required),
        hidden: config.hidden.or(previous.hidden),
        delta: config.delta.or(previous.delta),
    }
}

#[async_trait]
impl RemoteClient for InMemoryRemote {
    async fn get_organization(&self, org_id: i64) -> Result<Organization, RemoteError> {
        self.check_fault(RemoteOperation::GetOrganization)?;
        self.organizations
            .get(&org_id)
            .map(|org| org.value().clone())
            .ok_or_else(|| RemoteError::not_found("org", org_id.to_string()))
    }

    async fn get_organization_by_slug(
        &self,
        url_label: &str,
    ) -> Result<Organization, RemoteError> {
        self.check_fault(RemoteOperation::GetOrganization)?;
        self.organizations
            .iter()
            .find(|org| org.url_label == url_label)
            .map(|org| org.value().clone())
            .ok_or_else(|| RemoteError::not_found("org", url_label))
    }

    async fn create_space(&self, params: &CreateSpaceParams) -> Result<Space, RemoteError> {
        self.check_fault(RemoteOperation::CreateSpace)?;

        let org_label = self
            .organizations
            .get(&params.org_id)
            .map(|org| org.url_label.clone())
            .ok_or_else(|| {
                RemoteError::api(400, format!("organization {} does not exist", params.org_id))
            })?;

        let privacy = params
            .privacy
            .clone()
            .unwrap_or_else(|| DEFAULT_PRIVACY.to_string());
        check_privacy(&privacy)?;

        let url_label = slugify(&params.name);
        let space = Space {
            space_id: self.next_id(),
            org_id: params.org_id,
            name: params.name.clone(),
            url: format!("https://podio.com/{org_label}/{url_label}"),
            url_label,
            privacy,
            auto_join: params.auto_join.unwrap_or(false),
            post_on_new_app: params.post_on_new_app.unwrap_or(false),
            post_on_new_member: params.post_on_new_member.unwrap_or(false),
        };

        self.spaces.insert(space.space_id, space.clone());
        Ok(space)
    }

    async fn get_space(&self, space_id: i64) -> Result<Space, RemoteError> {
        self.check_fault(RemoteOperation::GetSpace)?;
        self.spaces
            .get(&space_id)
            .map(|space| space.value().clone())
            .ok_or_else(|| RemoteError::not_found("space", space_id.to_string()))
    }

    async fn update_space(
        &self,
        space_id: i64,
        params: &UpdateSpaceParams,
    ) -> Result<Space, RemoteError> {
        self.check_fault(RemoteOperation::UpdateSpace)?;
        if let Some(privacy) = &params.privacy {
            check_privacy(privacy)?;
        }

        let mut entry = self
            .spaces
            .get_mut(&space_id)
            .ok_or_else(|| RemoteError::not_found("space", space_id.to_string()))?;

        // Renaming keeps the original URL.
        let space = entry.value_mut();
        space.name = params.name.clone();
        if let Some(privacy) = &params.privacy {
            space.privacy = privacy.clone();
        }
        if let Some(auto_join) = params.auto_join {
            space.auto_join = auto_join;
        }
        if let Some(post) = params.post_on_new_app {
            space.post_on_new_app = post;
        }
        if let Some(post) = params.post_on_new_member {
            space.post_on_new_member = post;
        }

        Ok(space.clone())
    }

    async fn delete_space(&self, space_id: i64) -> Result<(), RemoteError> {
        self.check_fault(RemoteOperation::DeleteSpace)?;
        self.spaces
            .remove(&space_id)
            .ok_or_else(|| RemoteError::not_found("space", space_id.to_string()))?;

        let app_ids: Vec<i64> = self
            .apps
            .iter()
            .filter(|app| app.space_id == space_id)
            .map(|app| app.app_id)
            .collect();
        for app_id in app_ids {
            self.apps.remove(&app_id);
            self.fields.retain(|(owner, _), _| *owner != app_id);
        }

        Ok(())
    }

    async fn create_app(&self, space_id: i64, config: &AppConfig) -> Result<App, RemoteError> {
        self.check_fault(RemoteOperation::CreateApp)?;
        if !self.spaces.contains_key(&space_id) {
            return Err(RemoteError::api(400, format!("space {space_id} does not exist")));
        }

        let app = App {
            app_id: self.next_id(),
            space_id,
            config: apply_app_defaults(config, None),
        };
        self.apps.insert(app.app_id, app.clone());
        Ok(app)
    }

    async fn get_app(&self, app_id: i64) -> Result<App, RemoteError> {
        self.check_fault(RemoteOperation::GetApp)?;
        self.apps
            .get(&app_id)
            .map(|app| app.value().clone())
            .ok_or_else(|| RemoteError::not_found("app", app_id.to_string()))
    }

    async fn update_app(&self, app_id: i64, config: &AppConfig) -> Result<App, RemoteError> {
        self.check_fault(RemoteOperation::UpdateApp)?;
        let mut entry = self
            .apps
            .get_mut(&app_id)
            .ok_or_else(|| RemoteError::not_found("app", app_id.to_string()))?;

        let app = entry.value_mut();
        app.config = apply_app_defaults(config, Some(&app.config));
        Ok(app.clone())
    }

    async fn delete_app(&self, app_id: i64) -> Result<(), RemoteError> {
        self.check_fault(RemoteOperation::DeleteApp)?;
        self.apps
            .remove(&app_id)
            .ok_or_else(|| RemoteError::not_found("app", app_id.to_string()))?;
        self.fields.retain(|(owner, _), _| *owner != app_id);
        Ok(())
    }

    async fn create_app_field(
        &self,
        app_id: i64,
        params: &CreateAppFieldParams,
    ) -> Result<AppField, RemoteError> {
        self.check_fault(RemoteOperation::CreateAppField)?;
        if !self.apps.contains_key(&app_id) {
            return Err(RemoteError::api(400, format!("app {app_id} does not exist")));
        }

        let position = self
            .fields
            .iter()
            .filter(|entry| entry.key().0 == app_id)
            .count();
        let defaults = AppFieldConfig {
            label: String::new(),
            description: Some(String::new()),
            required: Some(false),
            hidden: Some(false),
            delta: Some(i64::try_from(position).unwrap_or(i64::MAX)),
        };

        let field = AppField {
            field_id: self.next_id(),
            app_id,
            field_type: params.field_type.clone(),
            external_id: Some(slugify(&params.config.label)),
            config: apply_field_defaults(&params.config, &defaults),
        };
        self.fields.insert((app_id, field.field_id), field.clone());
        Ok(field)
    }

    async fn get_app_field(&self, app_id: i64, field_id: i64) -> Result<AppField, RemoteError> {
        self.check_fault(RemoteOperation::GetAppField)?;
        self.fields
            .get(&(app_id, field_id))
            .map(|field| field.value().clone())
            .ok_or_else(|| RemoteError::not_found("field", format!("{app_id}/{field_id}")))
    }

    async fn update_app_field(
        &self,
        app_id: i64,
        field_id: i64,
        config: &AppFieldConfig,
    ) -> Result<AppField, RemoteError> {
        self.check_fault(RemoteOperation::UpdateAppField)?;
        let mut entry = self
            .fields
            .get_mut(&(app_id, field_id))
            .ok_or_else(|| RemoteError::not_found("field", format!("{app_id}/{field_id}")))?;

        let field = entry.value_mut();
        field.config = apply_field_defaults(config, &field.config);
        Ok(field.clone())
    }

    async fn delete_app_field(&self, app_id: i64, field_id: i64) -> Result<(), RemoteError> {
        self.check_fault(RemoteOperation::DeleteAppField)?;
        self.fields
            .remove(&(app_id, field_id))
            .map(|_| ())
            .ok_or_else(|| RemoteError::not_found("field", format!("{app_id}/{field_id}")))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> InMemoryRemote {
        InMemoryRemote::new().with_organization(42, "acme")
    }

    #[tokio::test]
    async fn test_create_space_applies_defaults() {
        let remote = remote();
        let space = remote
            .create_space(&CreateSpaceParams {
                org_id: 42,
                name: "Eng".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(space.privacy, "closed");
        assert!(!space.auto_join);
        assert_eq!(space.url, "https://podio.com/acme/eng");
        assert_eq!(space.url_label, "eng");
    }

    #[tokio::test]
    async fn test_create_space_requires_known_org() {
        let remote = remote();
        let err = remote
            .create_space(&CreateSpaceParams {
                org_id: 7,
                name: "Eng".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn test_rename_keeps_url() {
        let remote = remote();
        let space = remote
            .create_space(&CreateSpaceParams {
                org_id: 42,
                name: "Eng".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let updated = remote
            .update_space(
                space.space_id,
                &UpdateSpaceParams {
                    name: "Engineering".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Engineering");
        assert_eq!(updated.url, space.url);
    }

    #[tokio::test]
    async fn test_delete_space_cascades() {
        let remote = remote();
        let space = remote
            .create_space(&CreateSpaceParams {
                org_id: 42,
                name: "Eng".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let app = remote
            .create_app(
                space.space_id,
                &AppConfig {
                    name: "Tasks".into(),
                    item_name: "Task".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        remote
            .create_app_field(
                app.app_id,
                &CreateAppFieldParams {
                    field_type: "text".into(),
                    config: AppFieldConfig {
                        label: "Title".into(),
                        ..Default::default()
                    },
                },
            )
            .await
            .unwrap();

        remote.delete_space(space.space_id).await.unwrap();
        assert_eq!(remote.app_count(), 0);
        assert_eq!(remote.field_count(), 0);
        assert!(remote.get_space(space.space_id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_app_without_icon_clears_it() {
        let remote = remote();
        let space = remote
            .create_space(&CreateSpaceParams {
                org_id: 42,
                name: "Eng".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let config = AppConfig {
            name: "Tasks".into(),
            item_name: "Task".into(),
            icon: Some("12.png".into()),
            ..Default::default()
        };
        let app = remote.create_app(space.space_id, &config).await.unwrap();
        assert_eq!(app.config.icon.as_deref(), Some("12.png"));

        let updated = remote
            .update_app(
                app.app_id,
                &AppConfig {
                    icon: None,
                    ..config
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.config.icon, None);
        assert_eq!(updated.config.app_type.as_deref(), Some("standard"));
    }

    #[tokio::test]
    async fn test_field_positions_increase() {
        let remote = remote();
        let space = remote
            .create_space(&CreateSpaceParams {
                org_id: 42,
                name: "Eng".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let app = remote
            .create_app(
                space.space_id,
                &AppConfig {
                    name: "Tasks".into(),
                    item_name: "Task".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let mut deltas = Vec::new();
        for label in ["Title", "Due date"] {
            let field = remote
                .create_app_field(
                    app.app_id,
                    &CreateAppFieldParams {
                        field_type: "text".into(),
                        config: AppFieldConfig {
                            label: label.into(),
                            ..Default::default()
                        },
                    },
                )
                .await
                .unwrap();
            deltas.push(field.config.delta);
        }
        assert_eq!(deltas, vec![Some(0), Some(1)]);
    }

    #[tokio::test]
    async fn test_lookup_by_slug() {
        let remote = remote();
        let org = remote.get_organization_by_slug("acme").await.unwrap();
        assert_eq!(org.org_id, 42);
        assert!(
            remote
                .get_organization_by_slug("citrix")
                .await
                .unwrap_err()
                .is_not_found()
        );
    }
}
