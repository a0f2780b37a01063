use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use geobound_core_common::{
    BackendCapabilities, ConversionJob, ConversionOutput, ConvertError, Converter, SupportStatus,
};
use geojson::{FeatureCollection, GeoJson};
use log::debug;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::simplify::coordinate_count;

const SHP2JSON: &str = "shp2json";
const GEO2TOPO: &str = "geo2topo";

/// Converter that runs `shp2json` and, optionally, `geo2topo`.
///
/// `shp2json` writes the `GeoJSON` document to stdout; that document is piped
/// into `geo2topo` as `adm<N>=-` to build the TopoJSON document. Neither tool
/// is given a tolerance, so output is never simplified.
#[derive(Debug, Clone)]
pub struct ExternalConverter {
    shp2json: PathBuf,
    geo2topo: Option<PathBuf>,
}

impl ExternalConverter {
    /// Converter producing both `GeoJSON` and TopoJSON.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shp2json: platform_tool(SHP2JSON),
            geo2topo: Some(platform_tool(GEO2TOPO)),
        }
    }

    /// Converter producing `GeoJSON` only.
    #[must_use]
    pub fn geojson_only() -> Self {
        Self {
            shp2json: platform_tool(SHP2JSON),
            geo2topo: None,
        }
    }

    /// Uses explicit executables instead of looking the defaults up on `PATH`.
    #[must_use]
    pub fn with_tools(shp2json: impl Into<PathBuf>, geo2topo: Option<PathBuf>) -> Self {
        Self {
            shp2json: shp2json.into(),
            geo2topo,
        }
    }

    async fn shp2json(&self, job: &ConversionJob) -> Result<String, ConvertError> {
        let stdout = run_tool(&self.shp2json, [job.source.as_os_str()], None).await?;
        String::from_utf8(stdout).map_err(|e| ConvertError::Read {
            path: job.source.clone(),
            message: format!("shp2json produced non UTF-8 output: {e}"),
        })
    }

    async fn geo2topo(
        &self,
        tool: &Path,
        job: &ConversionJob,
        geojson: &str,
    ) -> Result<String, ConvertError> {
        let object = format!("{}=-", job.level.object_key());
        let stdout = run_tool(tool, [OsStr::new(&object)], Some(geojson.as_bytes())).await?;
        String::from_utf8(stdout).map_err(|e| ConvertError::Encode {
            format: "TopoJSON".to_string(),
            path: job.source.clone(),
            message: format!("geo2topo produced non UTF-8 output: {e}"),
        })
    }
}

impl Default for ExternalConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Converter for ExternalConverter {
    fn name(&self) -> &'static str {
        if self.geo2topo.is_some() {
            "external"
        } else {
            "external-geojson"
        }
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            geojson: SupportStatus::Supported,
            topojson: if self.geo2topo.is_some() {
                SupportStatus::Supported
            } else {
                SupportStatus::NotSupported
            },
            simplify: SupportStatus::NotSupported,
        }
    }

    async fn convert(&self, job: &ConversionJob) -> Result<ConversionOutput, ConvertError> {
        let geojson = self.shp2json(job).await?;
        let collection = parse_collection(&geojson).map_err(|message| ConvertError::Read {
            path: job.source.clone(),
            message: format!("shp2json output is not a FeatureCollection: {message}"),
        })?;

        let topojson = match &self.geo2topo {
            Some(tool) => Some(self.geo2topo(tool, job, &geojson).await?),
            None => None,
        };

        Ok(ConversionOutput {
            feature_count: collection.features.len(),
            coordinate_count: coordinate_count(&collection),
            geojson,
            topojson,
        })
    }
}

/// Tool names carry a `.cmd` suffix on Windows, where npm installs shims.
fn platform_tool(name: &str) -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(format!("{name}.cmd"))
    } else {
        PathBuf::from(name)
    }
}

fn tool_name(tool: &Path) -> String {
    tool.file_name()
        .unwrap_or(tool.as_os_str())
        .to_string_lossy()
        .into_owned()
}

fn parse_collection(text: &str) -> Result<FeatureCollection, String> {
    let geojson: GeoJson = text.parse().map_err(|e: geojson::Error| e.to_string())?;
    FeatureCollection::try_from(geojson).map_err(|e| e.to_string())
}

async fn run_tool<'a>(
    tool: &Path,
    args: impl IntoIterator<Item = &'a OsStr>,
    stdin: Option<&[u8]>,
) -> Result<Vec<u8>, ConvertError> {
    let name = tool_name(tool);
    let program = which::which(tool).map_err(|e| ConvertError::ToolMissing {
        tool: name.clone(),
        message: e.to_string(),
    })?;

    let mut command = Command::new(&program);
    command
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    debug!("Running {command:?}");

    let mut child = command.spawn().map_err(|e| ConvertError::ToolMissing {
        tool: name.clone(),
        message: e.to_string(),
    })?;

    let pipe = child.stdin.take();
    let feed = async move {
        if let (Some(mut pipe), Some(input)) = (pipe, stdin) {
            pipe.write_all(input).await?;
            pipe.shutdown().await?;
        }
        Ok::<(), std::io::Error>(())
    };
    let (fed, output) = futures::future::join(feed, child.wait_with_output()).await;
    let output = output.map_err(|e| ConvertError::Tool {
        tool: name.clone(),
        status: None,
        stderr: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(ConvertError::Tool {
            tool: name,
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    // A tool that exits successfully without reading all of stdin is not an error.
    if let Err(e) = fed {
        debug!("{name} closed stdin early: {e}");
    }
    Ok(output.stdout)
}
