//! People API v1 client built on blocking reqwest.
//!
//! Every call blocks until the service answers. Requests are authorized
//! with a bearer token obtained from a [`TokenSource`] right before sending.

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::aideon::contacts::auth::TokenSource;
use crate::aideon::contacts::config::{MAX_PAGE_SIZE, SyncConfig};
use crate::aideon::contacts::directory::ContactDirectory;
use crate::aideon::contacts::error::{Result, SyncError};
use crate::aideon::contacts::model::{ContactBody, ContactGroup, Name, RemoteContact, UserDefined};

/// Person fields requested when listing. Enough to reconcile, not a full copy.
pub const LIST_PERSON_FIELDS: &str = "names,userDefined";

/// Google style error document.
#[derive(Debug, Deserialize)]
struct ApiErrorDocument {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionsPage {
    #[serde(default)]
    connections: Vec<Person>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Person {
    resource_name: String,
    #[serde(default)]
    etag: Option<String>,
    #[serde(default)]
    names: Vec<Name>,
    #[serde(default)]
    user_defined: Vec<UserDefined>,
}

impl From<Person> for RemoteContact {
    fn from(person: Person) -> Self {
        RemoteContact {
            resource_name: person.resource_name,
            etag: person.etag,
            display_name: person
                .names
                .into_iter()
                .next()
                .and_then(|name| name.display_name),
            user_defined: person.user_defined.into_iter().next(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateGroupRequest<'a> {
    contact_group: GroupName<'a>,
}

#[derive(Debug, Serialize)]
struct GroupName<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModifyMembersRequest<'a> {
    resource_names_to_add: &'a [String],
}

/// Contacts directory backed by the People API.
pub struct PeopleClient {
    http: Client,
    base_url: String,
    page_size: u32,
    tokens: Box<dyn TokenSource>,
}

impl std::fmt::Debug for PeopleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeopleClient")
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl PeopleClient {
    /// Creates a client against `base_url`, e.g. `https://people.googleapis.com/v1`.
    pub fn new(base_url: impl Into<String>, tokens: Box<dyn TokenSource>) -> Result<Self> {
        Self::with_http(Client::builder().build()?, base_url, tokens)
    }

    /// Creates a client from the configuration, honouring its timeout.
    pub fn from_config(config: &SyncConfig, tokens: Box<dyn TokenSource>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let mut client = Self::with_http(builder.build()?, config.api_base_url.clone(), tokens)?;
        client.page_size = config.page_size;
        Ok(client)
    }

    pub fn with_http(
        http: Client,
        base_url: impl Into<String>,
        tokens: Box<dyn TokenSource>,
    ) -> Result<Self> {
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size: MAX_PAGE_SIZE,
            tokens,
        })
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn send(&mut self, request: RequestBuilder) -> Result<Response> {
        let token = self.tokens.access_token()?;
        let response = request.bearer_auth(token).send()?;
        check_status(response)
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorDocument>(&body) {
        Ok(document) => match document.error.status {
            Some(code) => format!("{code}: {}", document.error.message),
            None => document.error.message,
        },
        Err(_) => body,
    };
    Err(SyncError::Api {
        status: status.as_u16(),
        message,
    })
}

impl ContactDirectory for PeopleClient {
    #[instrument(level = "debug", skip(self))]
    fn list_all(&mut self) -> Result<Vec<RemoteContact>> {
        let url = self.url("people/me/connections");
        let page_size = self.page_size.to_string();
        let mut contacts = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page = 0usize;

        loop {
            page += 1;
            let mut query = vec![
                ("pageSize", page_size.as_str()),
                ("personFields", LIST_PERSON_FIELDS),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let request = self.http.get(&url).query(&query);
            let response: ConnectionsPage = self.send(request)?.json()?;
            debug!(page, count = response.connections.len(), "fetched connections page");
            contacts.extend(response.connections.into_iter().map(RemoteContact::from));

            match response.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => return Ok(contacts),
            }
        }
    }

    fn create(&mut self, body: &ContactBody) -> Result<String> {
        let request = self.http.post(self.url("people:createContact")).json(body);
        let person: Person = self.send(request)?.json()?;
        Ok(person.resource_name)
    }

    fn update(&mut self, contact: &RemoteContact, body: &ContactBody) -> Result<()> {
        let etag = contact.etag.clone().ok_or_else(|| SyncError::Api {
            status: 400,
            message: format!("{} has no etag to update against", contact.resource_name),
        })?;
        let mut body = body.clone();
        body.etag = Some(etag);
        let request = self
            .http
            .patch(self.url(&format!("{}:updateContact", contact.resource_name)))
            .query(&[("updatePersonFields", ContactBody::UPDATE_FIELDS)])
            .json(&body);
        self.send(request)?;
        Ok(())
    }

    fn delete(&mut self, resource_name: &str) -> Result<()> {
        let request = self
            .http
            .delete(self.url(&format!("{resource_name}:deleteContact")));
        self.send(request)?;
        Ok(())
    }

    fn create_group(&mut self, name: &str) -> Result<ContactGroup> {
        let request = self
            .http
            .post(self.url("contactGroups"))
            .json(&CreateGroupRequest {
                contact_group: GroupName { name },
            });
        Ok(self.send(request)?.json()?)
    }

    fn add_members(&mut self, group: &str, resource_names: &[String]) -> Result<()> {
        let request = self
            .http
            .post(self.url(&format!("{group}/members:modify")))
            .json(&ModifyMembersRequest {
                resource_names_to_add: resource_names,
            });
        self.send(request)?;
        Ok(())
    }

    fn delete_group(&mut self, group: &str, delete_contacts: bool) -> Result<()> {
        let request = self
            .http
            .delete(self.url(group))
            .query(&[("deleteContacts", delete_contacts)]);
        self.send(request)?;
        Ok(())
    }
}
