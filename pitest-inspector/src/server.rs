use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use actix_web::http::header::ContentType;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde::Deserialize;

use crate::assets::AssetResolver;
use crate::config::{Output, ServerConfig};
use crate::files::{is_contained, Files};
use crate::{render_file, renderer};

/// Shared by all workers. Only configuration lives here: sources and measures are read again for
/// every request.
pub struct AppState {
    config: ServerConfig,
    files: Files,
    assets: AssetResolver,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let files = Files::new(&config.source_dir);
        AppState { config, files, assets: AssetResolver::default() }
    }
}

#[derive(Deserialize)]
struct FileParams {
    #[serde(default)]
    output: Output,
}

/// Collects `<source path>.json` files below the measures directory as source paths.
fn list_measured_files(measures_dir: &Path) -> io::Result<Vec<PathBuf>> {
    fn visit(dir: &Path, relative: &Path, paths: &mut Vec<PathBuf>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if entry.file_type()?.is_dir() {
                visit(&entry.path(), &relative.join(&name), paths)?;
            } else if let Some(source_name) = name.to_str().and_then(|n| n.strip_suffix(".json")) {
                paths.push(relative.join(source_name));
            }
        }
        Ok(())
    }

    let mut paths = Vec::new();
    visit(measures_dir, Path::new(""), &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn html(mut response: actix_web::HttpResponseBuilder, body: String) -> HttpResponse {
    response.content_type(ContentType::html()).body(body)
}

fn error_page(mut response: actix_web::HttpResponseBuilder, data: &AppState, message: &str) -> HttpResponse {
    match renderer::render_index_with_error(&[] as &[PathBuf], &data.assets, message) {
        Ok(body) => html(response, body),
        Err(_) => response.body(message.to_owned()),
    }
}

async fn show_start(data: web::Data<AppState>) -> HttpResponse {
    let paths = match list_measured_files(&data.config.measures_dir) {
        Ok(paths) => paths,
        Err(err) => {
            tracing::warn!(measures_dir = %data.config.measures_dir.display(), error = %err, "cannot list measures");
            Vec::new()
        }
    };
    match renderer::render_index(&paths[..], &data.assets) {
        Ok(body) => html(HttpResponse::Ok(), body),
        Err(err) => error_page(HttpResponse::InternalServerError(), &data, &err.to_string()),
    }
}

async fn show_file(data: web::Data<AppState>, file: web::Path<PathBuf>, query: web::Query<FileParams>) -> HttpResponse {
    let file = file.into_inner();
    if !is_contained(&file) || !data.files.exists(&file) {
        tracing::warn!(file = %file.display(), "source file not found");
        return error_page(HttpResponse::NotFound(), &data, &format!("file not found: {}", file.display()));
    }

    let output = query.output;
    let state = data.clone();
    let request_file = file.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        let measures_path = state.config.measures_path(&request_file);
        render_file(&state.files, &request_file, &measures_path, &state.assets, output)
    }).await;

    match rendered {
        Ok(Ok(body)) => html(HttpResponse::Ok(), body),
        Ok(Err(err)) => {
            tracing::error!(file = %file.display(), error = %err, "render failed");
            error_page(HttpResponse::InternalServerError(), &data, &err.to_string())
        }
        Err(err) => {
            tracing::error!(file = %file.display(), error = %err, "render task failed");
            error_page(HttpResponse::InternalServerError(), &data, "render task failed")
        }
    }
}

/// Registers the viewer routes, serving static resources from `static_dir`.
pub fn routes(static_dir: PathBuf) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.route("/", web::get().to(show_start))
            .route("/file/{file:.*}", web::get().to(show_file))
            .service(actix_files::Files::new("/static", static_dir));
    }
}

pub async fn server(conf: ServerConfig) -> io::Result<()> {
    tracing::info!(
        source_dir = %conf.source_dir.display(),
        measures_dir = %conf.measures_dir.display(),
        "serving mutation results"
    );
    let port = conf.port;
    let static_dir = conf.static_dir();
    let state = web::Data::new(AppState::new(conf));

    tracing::info!("get started: http://127.0.0.1:{port}/");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes(static_dir.clone()))
    })
        .bind(("127.0.0.1", port))?
        .run()
        .await
}
