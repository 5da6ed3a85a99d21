//! Response envelopes of the v4 API.
//!
//! Accessors return raw JSON; these types are for callers that want to decode
//! a payload with [`crate::ApiOutcome::decode`]. Attribute structs list the
//! fields shared by list and detail responses and keep everything else in
//! `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope<A> {
    pub data: Vec<Resource<A>>,
    pub meta: PageMeta,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailEnvelope<A> {
    pub data: Resource<A>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<Resource<AttachmentAttributes>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub number_of_elements: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub first_page: bool,
    pub last_page: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource<A> {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: A,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFormat {
    pub file_url: String,
    pub format: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl FileFormat {
    pub fn is_pdf(&self) -> bool {
        self.format.eq_ignore_ascii_case("pdf")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAttributes {
    pub agency_id: Option<String>,
    pub docket_id: Option<String>,
    pub document_type: Option<String>,
    pub fr_doc_num: Option<String>,
    pub object_id: Option<String>,
    pub title: Option<String>,
    pub subtype: Option<String>,
    pub posted_date: Option<String>,
    pub last_modified_date: Option<String>,
    pub comment_start_date: Option<String>,
    pub comment_end_date: Option<String>,
    #[serde(default)]
    pub open_for_comment: bool,
    #[serde(default)]
    pub withdrawn: bool,
    #[serde(default)]
    pub file_formats: Option<Vec<FileFormat>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAttributes {
    pub agency_id: Option<String>,
    pub docket_id: Option<String>,
    pub document_type: Option<String>,
    pub object_id: Option<String>,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub comment_on_document_id: Option<String>,
    pub posted_date: Option<String>,
    pub last_modified_date: Option<String>,
    #[serde(default)]
    pub withdrawn: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocketAttributes {
    pub agency_id: Option<String>,
    pub docket_type: Option<String>,
    pub object_id: Option<String>,
    pub title: Option<String>,
    pub last_modified_date: Option<String>,
    pub dk_abstract: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentAttributes {
    pub title: Option<String>,
    pub doc_order: Option<u32>,
    #[serde(default)]
    pub file_formats: Option<Vec<FileFormat>>,
    pub modify_date: Option<String>,
    pub restrict_reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DetailEnvelope<DocumentAttributes> {
    /// PDF download URLs of the document body followed by its attachments.
    pub fn pdf_urls(&self) -> Vec<&str> {
        let own = self.data.attributes.file_formats.iter().flatten();
        let attached = self
            .included
            .iter()
            .flat_map(|attachment| attachment.attributes.file_formats.iter().flatten());

        own.chain(attached)
            .filter(|format| format.is_pdf())
            .map(|format| format.file_url.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{DetailEnvelope, DocketAttributes, DocumentAttributes, ListEnvelope};

    #[test]
    fn list_envelope_decodes_meta_and_items() {
        let body = json!({
            "data": [{
                "id": "EPA-HQ-OAR-2021-0317",
                "type": "dockets",
                "attributes": {
                    "agencyId": "EPA",
                    "docketType": "Rulemaking",
                    "title": "Methane standards",
                    "lastModifiedDate": "2024-03-08T10:31:05Z",
                    "highlightedContent": ""
                },
                "links": { "self": "https://api.regulations.gov/v4/dockets/EPA-HQ-OAR-2021-0317" }
            }],
            "meta": {
                "hasNextPage": true,
                "hasPreviousPage": false,
                "numberOfElements": 5,
                "pageNumber": 1,
                "pageSize": 5,
                "totalElements": 312,
                "totalPages": 63,
                "firstPage": true,
                "lastPage": false
            }
        });

        let envelope: ListEnvelope<DocketAttributes> =
            serde_json::from_value(body).expect("list envelope");
        assert_eq!(envelope.meta.total_elements, 312);
        assert!(envelope.meta.has_next_page);
        assert_eq!(envelope.data[0].kind, "dockets");
        assert_eq!(envelope.data[0].attributes.docket_type.as_deref(), Some("Rulemaking"));
        assert!(envelope.data[0].attributes.extra.contains_key("highlightedContent"));
    }

    #[test]
    fn detail_envelope_collects_pdf_urls_from_body_and_attachments() {
        let body = json!({
            "data": {
                "id": "FDA-2009-N-0501-0012",
                "type": "documents",
                "attributes": {
                    "title": "Guidance",
                    "fileFormats": [
                        { "fileUrl": "https://downloads.regulations.gov/doc/content.pdf", "format": "pdf", "size": 1024 },
                        { "fileUrl": "https://downloads.regulations.gov/doc/content.htm", "format": "htm", "size": 900 }
                    ]
                }
            },
            "included": [{
                "id": "0900006484e8b0a4",
                "type": "attachments",
                "attributes": {
                    "title": "Appendix",
                    "docOrder": 1,
                    "fileFormats": [
                        { "fileUrl": "https://downloads.regulations.gov/doc/attachment_1.pdf", "format": "PDF", "size": 42 }
                    ]
                }
            }]
        });

        let envelope: DetailEnvelope<DocumentAttributes> =
            serde_json::from_value(body).expect("detail envelope");
        assert_eq!(
            envelope.pdf_urls(),
            vec![
                "https://downloads.regulations.gov/doc/content.pdf",
                "https://downloads.regulations.gov/doc/attachment_1.pdf",
            ]
        );
    }
}
