//! Container image handle

/// A container image the pipeline works with: the id assigned at build
/// time (or the public reference for a pre-built image) plus, once
/// applied, the registry tag it is pushed and declared under.
///
/// The tag is single-assignment: [`crate::DockerCli::tag`] rejects a second
/// attempt.
#[derive(Debug, Clone)]
pub struct Image {
    id: String,
    tag: Option<String>,
}

impl Image {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: None,
        }
    }

    /// Handle for a public, pre-built image. The reference doubles as the
    /// id; no local build happens.
    pub fn prebuilt(reference: impl Into<String>) -> Self {
        Self::new(reference)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_tagged(&self) -> bool {
        self.tag.is_some()
    }

    /// The applied registry tag.
    ///
    /// # Panics
    ///
    /// Panics if the image has never been tagged. Pushing or declaring an
    /// untagged image is a programming error in the pipeline, not an
    /// operational failure.
    pub fn tag(&self) -> &str {
        self.tag.as_deref().expect("image must be tagged first")
    }

    pub(crate) fn set_tag(&mut self, tag: String) {
        self.tag = Some(tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prebuilt_reference_is_the_id() {
        let image = Image::prebuilt("postgres:13");
        assert_eq!(image.id(), "postgres:13");
        assert!(!image.is_tagged());
    }

    #[test]
    #[should_panic(expected = "image must be tagged first")]
    fn test_tag_accessor_panics_when_untagged() {
        let image = Image::prebuilt("postgres:13");
        let _ = image.tag();
    }
}
