//! Navigation state shared by every dashboard view.
//!
//! A [`Session`] always starts from a concrete [`View`]; there is no
//! "no session" state for components to trip over.
use co2_core::project::{ProjectDetail, SdlcStep};

/// One screen of the dashboard, addressable by a hash path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Projects,
    Project { id: u64 },
    Operations { project_id: u64 },
    InfrastructureElement { project_id: u64, element_id: u64 },
    Cicd { project_id: u64 },
    Pipeline { project_id: u64, pipeline_id: u64 },
}

const OPERATIONS: &str = "operations";
const CICD: &str = "integration-deployment";

impl View {
    pub fn path(&self) -> String {
        match self {
            View::Projects => "/projects".to_string(),
            View::Project { id } => format!("/projects/{}", id),
            View::Operations { project_id } => format!("/projects/{}/{}", project_id, OPERATIONS),
            View::InfrastructureElement {
                project_id,
                element_id,
            } => format!("/projects/{}/{}/{}", project_id, OPERATIONS, element_id),
            View::Cicd { project_id } => format!("/projects/{}/{}", project_id, CICD),
            View::Pipeline {
                project_id,
                pipeline_id,
            } => format!("/projects/{}/{}/{}", project_id, CICD, pipeline_id),
        }
    }

    /// Parse a path or location hash. The empty path and `/` both mean the
    /// projects overview; anything unrecognised is `None`.
    pub fn from_path(path: &str) -> Option<View> {
        let segments: Vec<&str> = path
            .trim_start_matches('#')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] | ["projects"] => Some(View::Projects),
            ["projects", id] => Some(View::Project { id: id.parse().ok()? }),
            ["projects", id, OPERATIONS] => Some(View::Operations {
                project_id: id.parse().ok()?,
            }),
            ["projects", id, OPERATIONS, element] => Some(View::InfrastructureElement {
                project_id: id.parse().ok()?,
                element_id: element.parse().ok()?,
            }),
            ["projects", id, CICD] => Some(View::Cicd {
                project_id: id.parse().ok()?,
            }),
            ["projects", id, CICD, pipeline] => Some(View::Pipeline {
                project_id: id.parse().ok()?,
                pipeline_id: pipeline.parse().ok()?,
            }),
            _ => None,
        }
    }

    pub fn project_id(&self) -> Option<u64> {
        match *self {
            View::Projects => None,
            View::Project { id } => Some(id),
            View::Operations { project_id }
            | View::InfrastructureElement { project_id, .. }
            | View::Cicd { project_id }
            | View::Pipeline { project_id, .. } => Some(project_id),
        }
    }

    /// The detail view an SDLC step card links to, if that step has one.
    pub fn for_sdlc_step(project_id: u64, step: &SdlcStep) -> Option<View> {
        match step.path_segment().as_str() {
            OPERATIONS => Some(View::Operations { project_id }),
            CICD => Some(View::Cicd { project_id }),
            _ => None,
        }
    }
}

/// A breadcrumb: display label plus the path it links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub path: String,
}

/// Application-wide state: the current view, the active project, and
/// friendly names for the last breadcrumb.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    view: View,
    active_project: Option<ProjectDetail>,
    element_name: Option<String>,
    pipeline_name: Option<String>,
}

impl Session {
    pub fn new(view: View) -> Self {
        Self {
            view,
            active_project: None,
            element_name: None,
            pipeline_name: None,
        }
    }

    /// Start from a location hash, falling back to the projects overview.
    pub fn from_hash(hash: &str) -> Self {
        let view = View::from_path(hash).unwrap_or_else(|| {
            log::warn!("Unknown location {:?}, showing projects", hash);
            View::Projects
        });
        Self::new(view)
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Switch views. Detail names only survive while their view is shown.
    pub fn navigate(&mut self, view: View) {
        if view != self.view {
            self.element_name = None;
            self.pipeline_name = None;
        }
        self.view = view;
    }

    pub fn active_project(&self) -> Option<&ProjectDetail> {
        self.active_project.as_ref()
    }

    pub fn set_active_project(&mut self, project: Option<ProjectDetail>) {
        self.active_project = project;
    }

    /// The cached project, when it is the one with `id`.
    pub fn cached_project(&self, id: u64) -> Option<&ProjectDetail> {
        self.active_project
            .as_ref()
            .filter(|detail| detail.project.id == id)
    }

    /// Tags of the active project; empty when none is loaded.
    pub fn project_tags(&self) -> Vec<String> {
        self.active_project
            .as_ref()
            .map(|detail| detail.project.tag_names())
            .unwrap_or_default()
    }

    pub fn set_element_name(&mut self, name: impl Into<String>) {
        self.element_name = Some(name.into());
    }

    pub fn set_pipeline_name(&mut self, name: impl Into<String>) {
        self.pipeline_name = Some(name.into());
    }

    /// `Home › projects › 3 › operations › orders-db`
    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        let path = self.view.path();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let mut crumbs = vec![Crumb {
            label: "Home".to_string(),
            path: View::Projects.path(),
        }];
        for (i, segment) in segments.iter().enumerate() {
            let label = match (i, self.view) {
                (3, View::InfrastructureElement { .. }) => self.element_name.as_deref(),
                (3, View::Pipeline { .. }) => self.pipeline_name.as_deref(),
                _ => None,
            };
            crumbs.push(Crumb {
                label: label.unwrap_or(*segment).to_string(),
                path: format!("/{}", segments[..=i].join("/")),
            });
        }
        crumbs
    }
}
