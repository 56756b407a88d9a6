#[macro_use] extern crate rocket;

mod classify;
mod config;
mod db;
mod photo;
mod store;

use config::Config;
use classify::Classification;
use db::DB;
use photo::NewPhoto;
use store::{BlobStore, DiskStore};
use std::{io, fmt::Display};
use std::path::PathBuf;
use rocket::{Build, Rocket, State};
use rocket::fairing::AdHoc;
use rocket::form::Form;
use rocket::fs::{FileServer, TempFile};
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket_db_pools::{sqlx, Connection, Database};
use rocket_dyn_templates::{Template, context};



#[launch]
fn rocket() -> _ {
    // Try to read the config file
    let config = Config::read_or_exit();

    // Let's go to spaaace !
    build(config)
}


/// Assemble a rocket from the given config. The config, the database pool and
/// the blob store are all attached here and handed to the route handlers
/// through managed state.
fn build(config: Config) -> Rocket<Build> {
    // Make sure the uploads directory exists before mounting the file server on it
    if let Err(error) = std::fs::create_dir_all(&config.UPLOADS_DIR) {
        eprintln!("Error, unable to create the uploads directory \"{}\" : {}", config.UPLOADS_DIR, error);
        std::process::exit(-1);
    }

    let figment = rocket::Config::figment()
        .merge(("address", config.ADDRESS.clone()))
        .merge(("port", config.PORT))
        .merge(("secret_key", config.SECRET_KEY.clone()))
        .merge(("databases.halide.url", format!("sqlite://{}", config.DATABASE_PATH)));

    let store: Box<dyn BlobStore> = Box::new(DiskStore::new(&config.UPLOADS_DIR));

    rocket::custom(figment)
        .mount("/", routes![
            get_index,
            get_upload_form,
            post_upload,
            get_upload_file,
        ])
        .mount("/media", FileServer::from(&config.UPLOADS_DIR).rank(0))
        .attach(Template::fairing())
        .attach(DB::init())
        .attach(AdHoc::try_on_ignite("Database schema", db::init_schema))
        .manage(config)
        .manage(store)
}


/// Route handler for the gallery index : every uploaded photo, newest first
#[get("/")]
async fn get_index(mut db: Connection<DB>, flash: Option<FlashMessage<'_>>, config: &State<Config>) -> PageResult {
    match db::get_all_photos(&mut db).await {

        // We have a valid (possibly empty) list of photos, render it
        Ok(photos) => PageResult::Ok(Template::render("index", context! {
            config: config.inner(),
            photos: photos,
            flash: flash.as_ref().map(|f| f.message().to_string()),
            url_upload_form: uri!(get_upload_form()).to_string(),
        })),

        Err(error) => {
            eprintln!("Error : unable to load the photo list : {}", error);
            PageResult::Err(())
        }
    }
}


/// Route handler for the upload form
#[get("/upload")]
fn get_upload_form(flash: Option<FlashMessage<'_>>, config: &State<Config>) -> Template {
    Template::render("upload", context! {
        config: config.inner(),
        flash: flash.as_ref().map(|f| f.message().to_string()),
        url_index: uri!(get_index()).to_string(),
    })
}


/// Multipart upload form : a single file field named `file`
#[derive(FromForm)]
struct UploadForm<'r> {
    file: Option<TempFile<'r>>,
}


/// Route handler for the upload pipeline : validate the submitted file,
/// store its bytes through the blob store, guess a category from the
/// filename and insert the photo row. User input errors redirect back to
/// the form with a flash message; storage and database errors are not
/// masked and produce a 500.
#[post("/upload", data = "<form>")]
async fn post_upload(form: Form<UploadForm<'_>>, mut db: Connection<DB>, store: &State<Box<dyn BlobStore>>) -> UploadResult {
    let upload = form.into_inner();

    // The file field must be present and carry a non-empty filename
    let Some(mut file) = upload.file else {
        return back_to_form("No file part");
    };
    let original_filename = file.raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str().to_string())
        .unwrap_or_default();
    if original_filename.is_empty() {
        return back_to_form("No selected file");
    }

    // Reduce the client-supplied name to something safe to write under the
    // uploads directory
    let Some(stored_name) = store::sanitize_filename(&original_filename) else {
        return back_to_form("Invalid filename");
    };

    // Store the raw bytes and get back the public URL of the file
    let image_url = match store.put(&stored_name, &mut file).await {
        Ok(url) => url,
        Err(error) => {
            eprintln!("Error : unable to store the uploaded file \"{}\" : {}", original_filename, error);
            return UploadResult::Err(());
        }
    };

    // Guess a category from the original filename. When the name can't be
    // classified the photo is still saved, with the default category and no
    // tags.
    let classification = classify::classify(&original_filename).unwrap_or_else(|| {
        eprintln!("Warning : unable to classify \"{}\", falling back to the default category", original_filename);
        Classification::default_fallback()
    });

    // Insert the photo row, the database assigns the id and the upload date
    let new_photo = NewPhoto::new(original_filename, image_url, &classification);
    match db::insert_photo(&mut db, &new_photo).await {
        Ok(_) => UploadResult::Flash(Flash::success(Redirect::to(uri!(get_index())), "Photo uploaded successfully!")),
        Err(error) => {
            eprintln!("Error : unable to insert a photo into the database : {}", error);
            UploadResult::Err(())
        }
    }
}


/// Route handler that redirects a stored filename to the static asset path
/// it is served from. Development-grade : this is not a general-purpose file
/// server.
#[get("/uploads/<filename>")]
fn get_upload_file(filename: &str, store: &State<Box<dyn BlobStore>>) -> Redirect {
    Redirect::to(store.serve_url(filename))
}


/// Redirect back to the upload form with a flashed message
fn back_to_form(message: &str) -> UploadResult {
    UploadResult::Flash(Flash::error(Redirect::to(uri!(get_upload_form())), message))
}


/// Bi-state responder used by the template routes
#[derive(Responder)]
pub enum PageResult {
    Ok(Template),
    #[response(status = 500)]
    Err(()),
}


/// Responder for the upload pipeline : a flash-carrying redirect for both
/// success and user input errors, a 500 for everything else
#[derive(Responder)]
pub enum UploadResult {
    Flash(Flash<Redirect>),
    #[response(status = 500)]
    Err(()),
}


/// Generic error type used to uniformize errors across the crate
#[derive(Debug)]
pub enum Error {
    FileError(io::Error, PathBuf),
    TomlParserError(toml::de::Error),
    DatabaseError(sqlx::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::FileError(error, path) => write!(f, "file error for \"{}\" : {}", path.display(), error),
            Error::TomlParserError(error) => write!(f, "parser error : {}", error),
            Error::DatabaseError(error) => write!(f, "database error : {}", error),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::TomlParserError(error)
    }
}
