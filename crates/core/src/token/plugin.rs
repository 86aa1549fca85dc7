use crate::fragment::FragmentBuilder;
use crate::payload::{OffsetAndCount, PluginName, PluginUpload};

use super::cell::empty_is_none;

/// Plugin management. These do not need an open spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginAction {
    /// Browse installed plugins.
    ListSelect(OffsetAndCount),
    /// Refetch the plugin list.
    ListReload(OffsetAndCount),
    /// Show one plugin.
    Select(PluginName),
    /// Delete a plugin.
    Delete(PluginName),
    /// Browse the files of a plugin archive, optionally one file.
    FileView(PluginName, Option<String>),
    /// Upload dialog.
    UploadSelect,
    /// Upload an archive.
    UploadSave(PluginUpload),
}

/// A plugin token.
#[derive(Debug, Clone)]
pub struct PluginToken {
    action: PluginAction,
}

impl PluginToken {
    /// An empty file path is the archive listing, stored as `None`.
    pub(crate) fn new(mut action: PluginAction) -> Self {
        if let PluginAction::FileView(_, path) = &mut action {
            empty_is_none(path);
        }
        Self { action }
    }

    /// What is happening.
    pub fn action(&self) -> &PluginAction {
        &self.action
    }

    /// The plugin being shown, browsed or deleted.
    pub fn plugin_name(&self) -> Option<&PluginName> {
        match &self.action {
            PluginAction::Select(name) | PluginAction::Delete(name) | PluginAction::FileView(name, _) => Some(name),
            PluginAction::UploadSave(upload) => Some(upload.name()),
            PluginAction::ListSelect(_) | PluginAction::ListReload(_) | PluginAction::UploadSelect => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match &self.action {
            PluginAction::ListSelect(_) => "plugin-list-select",
            PluginAction::ListReload(_) => "plugin-list-reload",
            PluginAction::Select(_) => "plugin-select",
            PluginAction::Delete(_) => "plugin-delete",
            PluginAction::FileView(..) => "plugin-file-view",
            PluginAction::UploadSelect => "plugin-upload-select",
            PluginAction::UploadSave(_) => "plugin-upload-save",
        }
    }

    pub(crate) fn write_fragment(&self, b: &mut FragmentBuilder) {
        match &self.action {
            PluginAction::ListSelect(oc) => {
                b.segments(["plugin", "*"]).raw(&oc.to_string());
            }
            PluginAction::ListReload(oc) => {
                b.segments(["plugin", "*"]).raw(&oc.to_string()).segment("reload");
            }
            PluginAction::Select(name) => {
                b.segment("plugin").segment(name);
            }
            PluginAction::Delete(name) => {
                b.segment("plugin").segment(name).segment("delete");
            }
            PluginAction::FileView(name, path) => {
                b.segment("plugin").segment(name).segment("file");
                if let Some(path) = path {
                    b.segment(path);
                }
            }
            PluginAction::UploadSelect => {
                b.segment("plugin-upload");
            }
            PluginAction::UploadSave(upload) => {
                b.segments(["plugin-upload", "save"]).segment(upload.to_json());
            }
        }
    }
}
