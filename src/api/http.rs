//! `drivews` web service client

use std::cell::RefCell;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{COOKIE, ORIGIN, REFERER, SET_COOKIE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use super::error::{ApiError, ApiResult};
use super::session::Session;
use super::wire::{
    CreateFoldersRequest, CreateFoldersResponse, MoveRequest, MoveResponse, RenameRequest,
    RenameResponse, RetrieveDetailsRequest, TrashRequest, TrashResponse, WireDetails,
};
use super::{CreatedFolder, DriveApi, ItemEtag, MaybeDetails, MovedItem, RenameItem};
use crate::types::{ChildItem, DriveId};

const WEB_ORIGIN: &str = "https://www.icloud.com";
const CLIENT_BUILD_NUMBER: &str = "2116Project37";
const CLIENT_MASTERING_NUMBER: &str = "2116B28";
const CLIENT_ID: &str = "f4058d20-0430-4cd5-bb85-7eb9b47fc94e";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Blocking HTTP implementation of [`DriveApi`]
///
/// Cookies sent back by the service replace the session's cookies, so the
/// session should be saved after use.
pub struct HttpDriveApi {
    client: Client,
    session: RefCell<Session>,
}

impl HttpDriveApi {
    pub fn new(session: Session) -> ApiResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            session: RefCell::new(session),
        })
    }

    /// Current session, including cookies refreshed by responses
    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    fn endpoint(&self, name: &str) -> ApiResult<Url> {
        let session = self.session.borrow();
        let mut url = Url::parse(&session.drivews_url)?.join(name)?;
        url.query_pairs_mut()
            .append_pair("dsid", &session.dsid)
            .append_pair("appIdentifier", "iclouddrive")
            .append_pair("clientBuildNumber", CLIENT_BUILD_NUMBER)
            .append_pair("clientMasteringNumber", CLIENT_MASTERING_NUMBER)
            .append_pair("clientId", CLIENT_ID);
        Ok(url)
    }

    fn post<B, R>(&self, name: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(name)?;
        let cookie = self.session.borrow().cookie_header();

        debug!("POST {}", name);

        let response = self
            .client
            .post(url)
            .header(ORIGIN, WEB_ORIGIN)
            .header(REFERER, format!("{}/", WEB_ORIGIN))
            .header(COOKIE, cookie)
            .json(body)
            .send()?;

        {
            let mut session = self.session.borrow_mut();
            for value in response.headers().get_all(SET_COOKIE) {
                if let Ok(value) = value.to_str() {
                    session.apply_set_cookie(value);
                }
            }
        }

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 421 {
            return Err(ApiError::Unauthorized(status.as_u16()));
        }

        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error message".to_string());

            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text()?;
        trace!("{} response: {}", name, text);

        Ok(serde_json::from_str(&text)?)
    }
}

impl DriveApi for HttpDriveApi {
    fn retrieve_item_details_in_folders(
        &self,
        drivewsids: &[DriveId],
    ) -> ApiResult<Vec<MaybeDetails>> {
        let body: Vec<_> = drivewsids.iter().map(RetrieveDetailsRequest::new).collect();
        let response: Vec<WireDetails> = self.post("retrieveItemDetailsInFolders", &body)?;

        response.into_iter().map(WireDetails::into_details).collect()
    }

    fn create_folders(&self, parent: &DriveId, names: &[String]) -> ApiResult<Vec<CreatedFolder>> {
        let response: CreateFoldersResponse =
            self.post("createFolders", &CreateFoldersRequest::new(parent, names))?;

        response.into_folders()
    }

    fn move_items_to_trash(&self, items: &[ItemEtag], permanent: bool) -> ApiResult<Vec<DriveId>> {
        let endpoint = if permanent {
            "deleteItems"
        } else {
            "moveItemsToTrash"
        };
        let response: TrashResponse = self.post(endpoint, &TrashRequest::new(items))?;

        Ok(response.into_ids())
    }

    fn rename_items(&self, items: &[RenameItem]) -> ApiResult<Vec<ChildItem>> {
        let response: RenameResponse = self.post("renameItems", &RenameRequest::new(items))?;

        response.into_children()
    }

    fn move_items(&self, destination: &DriveId, items: &[ItemEtag]) -> ApiResult<Vec<MovedItem>> {
        let response: MoveResponse = self.post("moveItems", &MoveRequest::new(destination, items))?;

        Ok(response.into_moved())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn api(url: &str) -> HttpDriveApi {
        HttpDriveApi::new(Session {
            dsid: "42".to_string(),
            drivews_url: url.to_string(),
            cookies: BTreeMap::new(),
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_url() {
        let url = api("https://p00-drivews.icloud.com:443").endpoint("createFolders").unwrap();
        assert_eq!(url.path(), "/createFolders");
        assert_eq!(url.host_str(), Some("p00-drivews.icloud.com"));
        assert!(url.query_pairs().any(|(k, v)| k == "dsid" && v == "42"));
        assert!(url.query_pairs().any(|(k, v)| k == "clientId" && v == CLIENT_ID));
    }

    #[test]
    fn test_invalid_service_url() {
        let result = api("not a url").endpoint("createFolders");
        assert!(matches!(result, Err(ApiError::Session(_))));
    }
}
