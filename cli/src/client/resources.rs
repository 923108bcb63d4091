//! Typed endpoints for each backend resource.
//!
//! Upload endpoints differ in how they expect booleans: team members and
//! practice areas take `"1"`/`"0"`, articles and carousel images take
//! `"true"`/`"false"`. Updates are sent as POST with a `_method=PUT` field.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::client::abort::AbortSignal;
use crate::client::api::{BufeteApiClient, ListQuery};
use crate::client::listing::{unwrap_resource, ListPage};
use crate::client::multipart::{
    ArrayEncoding, BoolEncoding, FileUpload, FormObject, MultipartBuilder, MultipartPayload,
};
use crate::error::{BufeteError, Result};
use crate::models::{
    Article, ArticleInput, CarouselImage, CarouselImageInput, ContactMessage, Credentials,
    MediaSlot, PracticeArea, PracticeAreaInput, Registration, SiteSettings, SiteSettingsInput,
    TeamMember, TeamMemberInput, User,
};

pub const TEAM_MEMBERS: &str = "team-members";
pub const PRACTICE_AREAS: &str = "practice-areas";
pub const ARTICLES: &str = "articles";
pub const MEDIA_SLOTS: &str = "media-slots";
pub const CAROUSEL_IMAGES: &str = "carousel-images";
pub const SETTINGS: &str = "settings";
pub const CONTACT: &str = "contact";

/// How a resource's upload form is encoded.
#[derive(Debug, Clone, Copy)]
struct UploadForm {
    booleans: BoolEncoding,
    file_field: &'static str,
    json_arrays: &'static [&'static str],
}

const TEAM_FORM: UploadForm = UploadForm {
    booleans: BoolEncoding::Numeric,
    file_field: "foto",
    json_arrays: &[],
};

const PRACTICE_AREA_FORM: UploadForm = UploadForm {
    booleans: BoolEncoding::Numeric,
    file_field: "icono",
    json_arrays: &["bullets"],
};

const ARTICLE_FORM: UploadForm = UploadForm {
    booleans: BoolEncoding::Literal,
    file_field: "portada",
    json_arrays: &[],
};

const CAROUSEL_FORM: UploadForm = UploadForm {
    booleans: BoolEncoding::Literal,
    file_field: "imagen",
    json_arrays: &[],
};

const MEDIA_SLOT_FORM: UploadForm = UploadForm {
    booleans: BoolEncoding::Numeric,
    file_field: "imagen",
    json_arrays: &[],
};

const SETTINGS_FORM: UploadForm = UploadForm {
    booleans: BoolEncoding::Numeric,
    file_field: "logo",
    json_arrays: &[],
};

impl UploadForm {
    fn payload<T: Serialize>(
        self,
        input: &T,
        file: Option<FileUpload>,
        update: bool,
    ) -> Result<MultipartPayload> {
        let form = FormObject::from_serialize(input)?.with_file(self.file_field, file);

        let mut builder = self
            .json_arrays
            .iter()
            .fold(MultipartBuilder::new(self.booleans), |b, field| {
                b.array_encoding(*field, ArrayEncoding::Json)
            });
        if update {
            builder = builder.method_override("PUT");
        }
        Ok(builder.build(&form))
    }
}

/// `collection/id`, with `id` encoded as a single path segment.
fn item_path(collection: &str, id: impl std::fmt::Display) -> String {
    let segment: String = form_urlencoded::byte_serialize(id.to_string().as_bytes()).collect();
    // byte_serialize writes spaces as '+' and escapes literal '+'
    format!("{collection}/{}", segment.replace('+', "%20"))
}

/// Response bodies of auth calls carry the user under `user`, under `data`,
/// or as the body itself.
fn user_from(body: Value) -> Result<User> {
    match body {
        Value::Object(mut map) if map.get("user").is_some_and(Value::is_object) => {
            Ok(serde_json::from_value(map.remove("user").unwrap_or_default())?)
        }
        other => Ok(unwrap_resource(other)?),
    }
}

fn as_auth_failure(err: BufeteError) -> BufeteError {
    match err {
        BufeteError::Unauthorized => {
            BufeteError::AuthenticationFailed("Invalid email or password".to_string())
        }
        BufeteError::Validation { message, .. } => BufeteError::AuthenticationFailed(message),
        other => other,
    }
}

impl BufeteApiClient {
    async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: MultipartPayload,
    ) -> Result<T> {
        let body = self.send_multipart(path, payload).await?;
        Ok(unwrap_resource(body)?)
    }

    // ----- Auth -------------------------------------------------------------

    /// Log in, storing the session cookie in this client's jar.
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        let body = self
            .send_json_body(Method::POST, "auth/login", credentials)
            .await
            .map_err(as_auth_failure)?;
        user_from(body)
    }

    /// Create a dashboard account.
    pub async fn register(&self, registration: &Registration) -> Result<User> {
        let body = self
            .send_json_body(Method::POST, "auth/register", registration)
            .await
            .map_err(as_auth_failure)?;
        user_from(body)
    }

    /// End the session on the backend.
    pub async fn logout(&self) -> Result<()> {
        self.send_json_body(Method::POST, "auth/logout", &serde_json::json!({}))
            .await?;
        Ok(())
    }

    /// The user the current session belongs to.
    pub async fn current_user(&self) -> Result<User> {
        let body: Value = self.get_resource("auth/me", None).await?;
        user_from(body)
    }

    // ----- Team members -----------------------------------------------------

    pub async fn list_team_members(
        &self,
        query: &ListQuery,
        signal: Option<&AbortSignal>,
    ) -> Result<ListPage<TeamMember>> {
        self.get_list(TEAM_MEMBERS, query, signal).await
    }

    pub async fn get_team_member(&self, id: u64) -> Result<TeamMember> {
        self.get_resource(&item_path(TEAM_MEMBERS, id), None).await
    }

    pub async fn create_team_member(
        &self,
        input: &TeamMemberInput,
        photo: Option<FileUpload>,
    ) -> Result<TeamMember> {
        let payload = TEAM_FORM.payload(input, photo, false)?;
        self.upload(TEAM_MEMBERS, payload).await
    }

    pub async fn update_team_member(
        &self,
        id: u64,
        input: &TeamMemberInput,
        photo: Option<FileUpload>,
    ) -> Result<TeamMember> {
        let payload = TEAM_FORM.payload(input, photo, true)?;
        self.upload(&item_path(TEAM_MEMBERS, id), payload).await
    }

    pub async fn delete_team_member(&self, id: u64) -> Result<()> {
        self.delete(&item_path(TEAM_MEMBERS, id)).await
    }

    // ----- Practice areas ---------------------------------------------------

    pub async fn list_practice_areas(
        &self,
        query: &ListQuery,
        signal: Option<&AbortSignal>,
    ) -> Result<ListPage<PracticeArea>> {
        self.get_list(PRACTICE_AREAS, query, signal).await
    }

    /// Fetch a practice area by id or slug.
    pub async fn get_practice_area(&self, id_or_slug: &str) -> Result<PracticeArea> {
        self.get_resource(&item_path(PRACTICE_AREAS, id_or_slug), None)
            .await
    }

    pub async fn create_practice_area(
        &self,
        input: &PracticeAreaInput,
        icon: Option<FileUpload>,
    ) -> Result<PracticeArea> {
        let payload = PRACTICE_AREA_FORM.payload(input, icon, false)?;
        self.upload(PRACTICE_AREAS, payload).await
    }

    pub async fn update_practice_area(
        &self,
        id: u64,
        input: &PracticeAreaInput,
        icon: Option<FileUpload>,
    ) -> Result<PracticeArea> {
        let payload = PRACTICE_AREA_FORM.payload(input, icon, true)?;
        self.upload(&item_path(PRACTICE_AREAS, id), payload).await
    }

    pub async fn delete_practice_area(&self, id: u64) -> Result<()> {
        self.delete(&item_path(PRACTICE_AREAS, id)).await
    }

    // ----- Articles ---------------------------------------------------------

    pub async fn list_articles(
        &self,
        query: &ListQuery,
        signal: Option<&AbortSignal>,
    ) -> Result<ListPage<Article>> {
        self.get_list(ARTICLES, query, signal).await
    }

    /// Fetch an article by id or slug.
    pub async fn get_article(&self, id_or_slug: &str) -> Result<Article> {
        self.get_resource(&item_path(ARTICLES, id_or_slug), None).await
    }

    pub async fn create_article(
        &self,
        input: &ArticleInput,
        cover: Option<FileUpload>,
    ) -> Result<Article> {
        let payload = ARTICLE_FORM.payload(input, cover, false)?;
        self.upload(ARTICLES, payload).await
    }

    pub async fn update_article(
        &self,
        id: u64,
        input: &ArticleInput,
        cover: Option<FileUpload>,
    ) -> Result<Article> {
        let payload = ARTICLE_FORM.payload(input, cover, true)?;
        self.upload(&item_path(ARTICLES, id), payload).await
    }

    pub async fn delete_article(&self, id: u64) -> Result<()> {
        self.delete(&item_path(ARTICLES, id)).await
    }

    // ----- Media slots ------------------------------------------------------

    pub async fn list_media_slots(&self) -> Result<ListPage<MediaSlot>> {
        self.get_list(MEDIA_SLOTS, &ListQuery::new(), None).await
    }

    /// Replace the image shown in the slot named `key`.
    pub async fn upload_media_slot(
        &self,
        key: &str,
        label: Option<&str>,
        image: FileUpload,
    ) -> Result<MediaSlot> {
        let input = serde_json::json!({ "etiqueta": label });
        let payload = MEDIA_SLOT_FORM.payload(&input, Some(image), true)?;
        self.upload(&item_path(MEDIA_SLOTS, key), payload).await
    }

    // ----- Carousel ---------------------------------------------------------

    pub async fn list_carousel_images(&self) -> Result<ListPage<CarouselImage>> {
        self.get_list(CAROUSEL_IMAGES, &ListQuery::new(), None)
            .await
    }

    pub async fn create_carousel_image(
        &self,
        input: &CarouselImageInput,
        image: FileUpload,
    ) -> Result<CarouselImage> {
        let payload = CAROUSEL_FORM.payload(input, Some(image), false)?;
        self.upload(CAROUSEL_IMAGES, payload).await
    }

    pub async fn delete_carousel_image(&self, id: u64) -> Result<()> {
        self.delete(&item_path(CAROUSEL_IMAGES, id)).await
    }

    // ----- Settings & contact -----------------------------------------------

    pub async fn get_settings(&self) -> Result<SiteSettings> {
        self.get_resource(SETTINGS, None).await
    }

    pub async fn update_settings(
        &self,
        input: &SiteSettingsInput,
        logo: Option<FileUpload>,
    ) -> Result<SiteSettings> {
        let payload = SETTINGS_FORM.payload(input, logo, true)?;
        self.upload(SETTINGS, payload).await
    }

    /// Submit the public contact form.
    pub async fn send_contact(&self, message: &ContactMessage) -> Result<()> {
        self.send_json_body(Method::POST, CONTACT, message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use crate::config::ApiConfig;
    use url::Url;

    fn client_for(server: &MockServer) -> BufeteApiClient {
        BufeteApiClient::new(&ApiConfig::with_base_url(format!("{}/api", server.uri()))).unwrap()
    }

    fn body_of(request: &Request) -> String {
        String::from_utf8_lossy(&request.body).into_owned()
    }

    /// The text value of multipart field `name` in a raw body.
    fn field(body: &str, name: &str) -> Option<String> {
        let marker = format!("name=\"{name}\"\r\n\r\n");
        let start = body.find(&marker)? + marker.len();
        let end = body[start..].find("\r\n")? + start;
        Some(body[start..end].to_string())
    }

    #[test]
    fn item_path_keeps_slug_in_one_segment() {
        assert_eq!(item_path(TEAM_MEMBERS, 7), "team-members/7");
        assert_eq!(
            item_path(PRACTICE_AREAS, "derecho-civil"),
            "practice-areas/derecho-civil"
        );

        let path = item_path(ARTICLES, "a/b?draft=1#top c+d");
        assert_eq!(path, "articles/a%2Fb%3Fdraft%3D1%23top%20c%2Bd");

        let url = Url::parse("http://localhost:8000/api/").unwrap().join(&path).unwrap();
        assert_eq!(url.path(), "/api/articles/a%2Fb%3Fdraft%3D1%23top%20c%2Bd");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[tokio::test]
    async fn team_list_filters_and_normalizes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/team-members"))
            .and(query_param("nombre", "ana"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": 1, "nombre": "Ana Ruiz" }],
                "meta": { "current_page": 1, "last_page": 1 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let page = client
            .list_team_members(&ListQuery::new().filter("nombre", "ana"), None)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Ana Ruiz");
        let meta = page.meta.unwrap();
        assert_eq!(meta.current_page, Some(1));
        assert!(!meta.has_more());
        assert!(!client.refresh_coordinator().is_refreshing());
    }

    #[tokio::test]
    async fn team_member_upload_uses_numeric_booleans() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/team-members"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "message": "Created",
                "data": { "id": 5, "nombre": "Ana Ruiz", "foto": "team/ana.jpg" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let input = TeamMemberInput {
            name: Some("Ana Ruiz".to_string()),
            active: Some(true),
            ..TeamMemberInput::default()
        };
        let photo = FileUpload::new("ana.jpg", "image/jpeg", vec![0xFF, 0xD8]);
        let member = client.create_team_member(&input, Some(photo)).await.unwrap();

        assert_eq!(member.id, 5);
        assert_eq!(
            client.assets().resolve(member.photo.as_deref()),
            format!("{}/team/ana.jpg", server.uri())
        );

        let requests = server.received_requests().await.unwrap();
        let body = body_of(&requests[0]);
        assert_eq!(field(&body, "activo").as_deref(), Some("1"));
        assert_eq!(field(&body, "nombre").as_deref(), Some("Ana Ruiz"));
        assert!(body.contains("name=\"foto\"; filename=\"ana.jpg\""));
        assert!(field(&body, "_method").is_none());
    }

    #[tokio::test]
    async fn practice_area_update_sends_json_bullets() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/practice-areas/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3, "titulo": "Laboral", "bullets": ["Despidos", "ERTE"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let input = PracticeAreaInput {
            bullets: Some(vec!["Despidos".to_string(), "ERTE".to_string()]),
            active: Some(false),
            ..PracticeAreaInput::default()
        };
        let area = client_for(&server)
            .update_practice_area(3, &input, None)
            .await
            .unwrap();
        assert_eq!(area.bullets, vec!["Despidos", "ERTE"]);

        let requests = server.received_requests().await.unwrap();
        let body = body_of(&requests[0]);
        assert_eq!(field(&body, "_method").as_deref(), Some("PUT"));
        assert_eq!(field(&body, "bullets").as_deref(), Some(r#"["Despidos","ERTE"]"#));
        assert_eq!(field(&body, "activo").as_deref(), Some("0"));
        assert!(field(&body, "bullets[0]").is_none());
    }

    #[tokio::test]
    async fn article_upload_uses_literal_booleans_and_indexed_tags() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": { "id": 12, "titulo": "Herencias" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let input = ArticleInput {
            title: Some("Herencias".to_string()),
            tags: Some(vec!["civil".to_string(), "familia".to_string()]),
            published: Some(true),
            ..ArticleInput::default()
        };
        client_for(&server).create_article(&input, None).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body = body_of(&requests[0]);
        assert_eq!(field(&body, "publicado").as_deref(), Some("true"));
        assert_eq!(field(&body, "tags[0]").as_deref(), Some("civil"));
        assert_eq!(field(&body, "tags[1]").as_deref(), Some("familia"));
    }

    #[tokio::test]
    async fn login_failure_is_an_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Token has expired" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let credentials = Credentials {
            email: "admin@example.com".to_string(),
            password: "wrong".to_string(),
            remember: false,
        };
        let err = client_for(&server).login(&credentials).await.unwrap_err();
        assert!(matches!(err, BufeteError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn login_returns_user_and_keeps_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "bufete_session=s3cr3t; Path=/; HttpOnly")
                    .set_body_json(json!({
                        "user": { "id": 1, "name": "Admin", "email": "admin@example.com" }
                    })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let credentials = Credentials {
            email: "admin@example.com".to_string(),
            password: "secret".to_string(),
            remember: true,
        };
        let user = client.login(&credentials).await.unwrap();

        assert_eq!(user.email, "admin@example.com");
        assert_eq!(client.session_cookies().as_deref(), Some("bufete_session=s3cr3t"));
    }

    #[tokio::test]
    async fn contact_form_is_posted_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/contact"))
            .and(body_json(json!({
                "nombre": "Luis",
                "email": "luis@example.com",
                "mensaje": "Necesito asesoramiento"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "Enviado" })))
            .expect(1)
            .mount(&server)
            .await;

        let message = ContactMessage {
            name: "Luis".to_string(),
            email: "luis@example.com".to_string(),
            phone: None,
            subject: None,
            message: "Necesito asesoramiento".to_string(),
        };
        client_for(&server).send_contact(&message).await.unwrap();
    }

    #[tokio::test]
    async fn media_slot_upload_targets_slot_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/media-slots/home_hero"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "id": 2, "clave": "home_hero", "imagen": "/storage/media/hero.webp" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let image = FileUpload::new("hero.webp", "image/webp", vec![1, 2, 3]);
        let slot = client_for(&server)
            .upload_media_slot("home_hero", None, image)
            .await
            .unwrap();
        assert_eq!(slot.key, "home_hero");

        let requests = server.received_requests().await.unwrap();
        let body = body_of(&requests[0]);
        assert!(body.contains("name=\"imagen\"; filename=\"hero.webp\""));
        assert!(field(&body, "etiqueta").is_none());
    }
}
