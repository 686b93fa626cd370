use std::path::{Path, PathBuf};

use meshcouple::generate::{
    self,
    MeshFiles,
    ProjectCfg,
};
use meshcouple::mesh;
use meshcouple::resolve::Domain;
use meshcouple::validate;

fn data(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name).display().to_string()
}

fn project_cfg(output_dir: &Path) -> ProjectCfg {
    let mut cfg = ProjectCfg::example();
    cfg.project_name = "test_nozzle".to_string();
    cfg.output_dir = output_dir.display().to_string();
    cfg.meshes = MeshFiles{
        solid: Some(data("solid.msh")),
        interior_fluid: Some(data("interior.msh")),
        exterior_fluid: Some(data("exterior.msh")),
        cooling_channel_fluid: Some(data("cooling_channel.msh")),
    };
    cfg
}

fn read(root: &Path, relative: &str) -> String {
    std::fs::read_to_string(root.join(relative)).unwrap()
}

#[test]
fn full_project_is_valid() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("project");
    let report = generate::generate_project(&project_cfg(&root)).unwrap();

    assert_eq!(report.validation_errors, Vec::<String>::new());
    assert!(report.missing_interfaces().is_empty());
    assert!(report.mesh_diagnostics().is_empty());
    assert_eq!(report.meshes.len(), 4);

    for domain in [Domain::Solid, Domain::InteriorFluid, Domain::ExteriorFluid, Domain::CoolingChannelFluid] {
        assert!(root.join(domain.mesh_destination()).is_file());
    }

    let coupling = read(&root, "precice-config.xml");
    assert!(coupling.contains("<mesh name=\"Nozzle_Inner_Wall-Fluid-Mesh\">"));
    assert!(coupling.contains("<mesh name=\"Cooling_Channel_1_Wall-Solid-Mesh\">"));
    assert!(coupling.contains("openfoam/cooling_channel/mesh.msh"));
    assert!(!coupling.contains("SOLID_MESH_FILE"));
    assert!(coupling.contains("test_nozzle"));

    let readme = read(&root, "README.md");
    assert!(readme.contains("Cooling channel entry: Cooling_Channel_1_Entry_Wall"));
    assert!(readme.contains("rhoPimpleFoam"));
    assert!(!root.join("openfoam/interior/constant/reactions").exists());
}

#[test]
fn solid_outer_wall_gets_element_set() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("project");
    generate::generate_project(&project_cfg(&root)).unwrap();

    let deck = read(&root, "calculix/nozzle.inp");
    assert!(deck.contains("*Elset, elset=Nozzle_Outer_Wall\n1, 2\n"));
    assert!(deck.contains("*Element, type=C3D4, elset=Eall\n1, 1, 2, 3, 4\n2, 2, 3, 4, 5\n"));
    assert!(deck.starts_with("*Heading\ntest_nozzle solid\n"));
}

#[test]
fn cooling_fragments_list_only_fsi_walls() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("project");
    let report = generate::generate_project(&project_cfg(&root)).unwrap();

    let entry = report.interfaces.iter().find(|m| m.role.name == "COOLING_CHANNEL_ENTRY").unwrap();
    assert_eq!(entry.matches, vec![
        "Cooling_Channel_1_Entry_Wall".to_string(),
        "Cooling_Channel_2_Entry_Wall".to_string(),
    ]);

    let fragment = read(&root, "openfoam/cooling_channel/0/T.boundaryField");
    let patches: Vec<&str> = fragment.lines()
        .filter(|line| line.starts_with("    ") && !line.trim_start().starts_with(['{', '}', 't']))
        .map(|line| line.trim())
        .collect();
    assert_eq!(patches, vec!["Cooling_Channel_1_Wall"]);
    assert!(read(&root, "openfoam/interior/0/pointDisplacement.boundaryField").contains("    Nozzle_Inner_Wall\n"));
}

#[test]
fn missing_mesh_leaves_sentinel_and_is_flagged() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("project");
    let mut cfg = project_cfg(&root);
    cfg.meshes.exterior_fluid = None;

    let report = generate::generate_project(&cfg).unwrap();
    assert_eq!(report.replacements.get("{{EXTERIOR_FSI}}"), Some("MISSING_EXTERIOR_FSI"));
    assert!(read(&root, "precice-config.xml").contains("MISSING_EXTERIOR_FSI-Fluid-Mesh"));

    assert_eq!(report.validation_errors.len(), 2, "{:?}", report.validation_errors);
    assert!(report.validation_errors.contains(&"Missing required file: openfoam/exterior/mesh.msh".to_string()));
    assert!(report.validation_errors.iter().any(|error| error.contains("unresolved interface MISSING_EXTERIOR_FSI")));
}

#[test]
fn combustion_writes_chemistry_and_switches_solver() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("project");
    let mut cfg = project_cfg(&root);
    cfg.combustion = true;
    cfg.inert_specie = "AR".to_string();

    let report = generate::generate_project(&cfg).unwrap();
    assert!(report.validation_errors.is_empty(), "{:?}", report.validation_errors);
    assert!(read(&root, "openfoam/interior/constant/thermophysicalProperties").contains("inertSpecie     AR;"));
    assert!(read(&root, "openfoam/exterior/system/controlDict").contains("application     reactingFoam;"));
    assert!(read(&root, "Allrun").contains("reactingFoam"));
}

#[test]
fn user_skeleton_and_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let skeleton = dir.path().join("skeleton");
    std::fs::create_dir_all(skeleton.join("openfoam/interior/system")).unwrap();
    std::fs::write(skeleton.join("openfoam/interior/system/fvSolution"), "tolerance {{solver.tolerance}};\n").unwrap();
    std::fs::write(skeleton.join("precice-config.xml"), "<mesh name=\"{{INTERIOR_FSI}}-Fluid-Mesh\">\n").unwrap();

    let root = dir.path().join("project");
    let mut cfg = project_cfg(&root);
    cfg.template_dir = Some(skeleton.display().to_string());
    cfg.parameters = serde_yaml::from_str("solver:\n  tolerance: 0.5\n").unwrap();

    let report = generate::generate_project(&cfg).unwrap();
    assert_eq!(read(&root, "openfoam/interior/system/fvSolution"), "tolerance 0.5;\n");
    assert_eq!(read(&root, "precice-config.xml"), "<mesh name=\"Nozzle_Inner_Wall-Fluid-Mesh\">\n");
    // No Allrun, Allclean or README in this skeleton
    assert_eq!(report.validation_errors.len(), 3, "{:?}", report.validation_errors);
}

#[test]
fn regeneration_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("project");
    let cfg = project_cfg(&root);
    generate::generate_project(&cfg).unwrap();
    let first = read(&root, "precice-config.xml");

    let report = generate::generate_project(&cfg).unwrap();
    assert_eq!(read(&root, "precice-config.xml"), first);
    assert!(report.validation_errors.is_empty());

    let mesh_files: Vec<PathBuf> = cfg.meshes.paths();
    assert!(validate::validate_project(&root, &mesh_files).is_empty());
}

#[test]
fn truncated_mesh_is_partial() {
    let loaded = mesh::load_mesh(Path::new(&data("truncated.msh")), None).unwrap();
    assert!(!loaded.is_complete());
    assert!(loaded.mesh.diagnostics().iter().any(|diagnostic| diagnostic.section == "Elements"));
    assert_eq!(loaded.mesh.value().n_nodes(), 3);
    assert!(loaded.names.is_complete());
    assert!(loaded.names.value().contains_name("Nozzle_Inner_Wall"));
}

#[test]
fn fixture_counts_match_headers() {
    let solid = mesh::load_mesh(Path::new(&data("solid.msh")), None).unwrap();
    assert!(solid.is_complete());
    assert_eq!(solid.mesh.value().n_nodes(), 5);
    assert_eq!(solid.mesh.value().n_elements(), 4);
    for element in solid.mesh.value().elements.iter() {
        assert!(solid.mesh.value().physical_sets[&element.physical].contains(&element.id));
    }

    let exterior = mesh::load_mesh(Path::new(&data("exterior.msh")), None).unwrap();
    assert!(exterior.is_complete(), "{:?}", exterior.diagnostics().collect::<Vec<_>>());
    assert_eq!(exterior.mesh.value().n_nodes(), 4);
    assert_eq!(exterior.mesh.value().physical_sets[&9], vec![2]);
}
