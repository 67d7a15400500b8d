//! Raster image embedding as PDF XObjects

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::GenericImageView;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

type EmbedResult = std::result::Result<ImageHandle, String>;

/// One image embedded in the output document
#[derive(Debug, Clone)]
pub struct ImageHandle {
    /// Resource name content streams reference (`/Im1 Do`)
    pub name: String,
    pub object_id: ObjectId,
    /// Source pixel width
    pub width: u32,
    /// Source pixel height
    pub height: u32,
}

/// Embeds each distinct image file once per document
///
/// The default logo appears on every row of every sheet; embedding it per
/// draw would multiply the file size by the sticker count. Decode failures
/// are cached as well, so a broken file is read once and reported on every
/// row that needed it.
#[derive(Debug, Default)]
pub struct ImageStore {
    cache: HashMap<PathBuf, EmbedResult>,
    handles: Vec<ImageHandle>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed `path` into `doc` (or reuse the earlier embed) and return its handle
    ///
    /// The `Err` carries the human-readable decode failure for the caller to
    /// turn into a warning.
    pub fn embed(&mut self, doc: &mut Document, path: &Path) -> EmbedResult {
        if let Some(cached) = self.cache.get(path) {
            return cached.clone();
        }

        let result = embed_file(doc, path, self.handles.len() + 1);
        if let Ok(handle) = &result {
            self.handles.push(handle.clone());
        }
        self.cache.insert(path.to_path_buf(), result.clone());
        result
    }

    /// Successfully embedded images, in embed order
    pub fn handles(&self) -> &[ImageHandle] {
        &self.handles
    }
}

/// Decode an image file and add it to the document as an Image XObject
///
/// Sources with an alpha channel get a separate DeviceGray SMask XObject so
/// transparency survives into the placed sticker artwork.
fn embed_file(doc: &mut Document, path: &Path, index: usize) -> EmbedResult {
    let img = image::io::Reader::open(path)
        .map_err(|e| e.to_string())?
        .with_guessed_format()
        .map_err(|e| e.to_string())?
        .decode()
        .map_err(|e| e.to_string())?;

    let (width, height) = img.dimensions();

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));

    let rgb_data = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        let pixels = (width * height) as usize;
        let mut rgb = Vec::with_capacity(pixels * 3);
        let mut alpha = Vec::with_capacity(pixels);
        for px in rgba.as_raw().chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
            alpha.push(px[3]);
        }

        let mut smask_dict = Dictionary::new();
        smask_dict.set("Type", Object::Name(b"XObject".to_vec()));
        smask_dict.set("Subtype", Object::Name(b"Image".to_vec()));
        smask_dict.set("Width", Object::Integer(width as i64));
        smask_dict.set("Height", Object::Integer(height as i64));
        smask_dict.set("ColorSpace", Object::Name(b"DeviceGray".to_vec()));
        smask_dict.set("BitsPerComponent", Object::Integer(8));
        let smask_id = doc.add_object(Stream::new(smask_dict, alpha));

        dict.set("SMask", Object::Reference(smask_id));
        rgb
    } else {
        img.to_rgb8().into_raw()
    };

    let object_id = doc.add_object(Stream::new(dict, rgb_data));

    Ok(ImageHandle {
        name: format!("Im{}", index),
        object_id,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_embed_caches_by_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("logo.png");
        RgbImage::from_pixel(4, 4, Rgb([10, 20, 30])).save(&path).unwrap();

        let mut doc = Document::with_version("1.5");
        let mut store = ImageStore::new();

        let first = store.embed(&mut doc, &path).unwrap();
        let objects_after_first = doc.objects.len();
        let second = store.embed(&mut doc, &path).unwrap();

        assert_eq!(first.name, second.name);
        assert_eq!(first.object_id, second.object_id);
        assert_eq!(doc.objects.len(), objects_after_first);
        assert_eq!(store.handles().len(), 1);
    }

    #[test]
    fn test_distinct_files_get_distinct_names() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.png");
        let b = tmp.path().join("b.png");
        RgbImage::from_pixel(2, 2, Rgb([0, 0, 0])).save(&a).unwrap();
        RgbImage::from_pixel(2, 2, Rgb([255, 255, 255])).save(&b).unwrap();

        let mut doc = Document::with_version("1.5");
        let mut store = ImageStore::new();
        assert_eq!(store.embed(&mut doc, &a).unwrap().name, "Im1");
        assert_eq!(store.embed(&mut doc, &b).unwrap().name, "Im2");
    }

    #[test]
    fn test_alpha_source_gets_smask() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("translucent.png");
        RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 128])).save(&path).unwrap();

        let mut doc = Document::with_version("1.5");
        let mut store = ImageStore::new();
        let handle = store.embed(&mut doc, &path).unwrap();

        let object = doc.get_object(handle.object_id).unwrap();
        match object {
            Object::Stream(stream) => {
                assert!(stream.dict.get(b"SMask").is_ok());
                // RGB bytes only; alpha lives in the SMask
                assert_eq!(stream.content.len(), 4 * 4 * 3);
            }
            other => panic!("expected stream, got {:?}", other),
        }
    }

    #[test]
    fn test_opaque_source_has_no_smask() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("opaque.png");
        RgbImage::from_pixel(3, 5, Rgb([1, 2, 3])).save(&path).unwrap();

        let mut doc = Document::with_version("1.5");
        let mut store = ImageStore::new();
        let handle = store.embed(&mut doc, &path).unwrap();

        assert_eq!(handle.width, 3);
        assert_eq!(handle.height, 5);
        let object = doc.get_object(handle.object_id).unwrap();
        match object {
            Object::Stream(stream) => assert!(stream.dict.get(b"SMask").is_err()),
            other => panic!("expected stream, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_failure_is_cached() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        fs::write(&path, b"this is not a png").unwrap();

        let mut doc = Document::with_version("1.5");
        let mut store = ImageStore::new();

        assert!(store.embed(&mut doc, &path).is_err());
        assert!(store.embed(&mut doc, &path).is_err());
        assert!(store.handles().is_empty());
    }
}
