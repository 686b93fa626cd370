use crate::{
    args,
    generate,
    MeshcoupleResult,
};

/// Render the example project config in the given format.
pub fn example_cfg(format: args::CfgFormat) -> args::ProcResult<String> {
    let cfg = generate::ProjectCfg::example();
    let text = match format {
        args::CfgFormat::Yaml => serde_yaml::to_string(&cfg)?,
        args::CfgFormat::Json => serde_json::to_string_pretty(&cfg)?,
        args::CfgFormat::Toml => toml::to_string_pretty(&cfg)?,
    };
    Ok(text)
}

/// Display an example config file.
pub fn example_config(example_args: args::ExampleCli) -> MeshcoupleResult<()> {
    println!("{}", example_cfg(example_args.format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_format_reads_back() {
        let yaml: generate::ProjectCfg = serde_yaml::from_str(&example_cfg(args::CfgFormat::Yaml).unwrap()).unwrap();
        let json: generate::ProjectCfg = serde_json::from_str(&example_cfg(args::CfgFormat::Json).unwrap()).unwrap();
        let toml_cfg: generate::ProjectCfg = toml::from_str(&example_cfg(args::CfgFormat::Toml).unwrap()).unwrap();

        for cfg in [yaml, json, toml_cfg] {
            assert_eq!(cfg.output_dir, "PATH/TO/OUTPUT/DIR");
            assert_eq!(cfg.roles.len(), 8);
            assert_eq!(cfg.meshes.get(crate::resolve::Domain::Solid), Some("PATH/TO/solid.msh"));
        }
    }
}
