use projtools::defaults::Defaults;
use projtools::tidy::tidy_file;
use std::fs;
use tempfile::TempDir;

const PROJECT: &str = "\u{feff}<?xml version=\"1.0\" encoding=\"utf-8\"?>
<Project xmlns=\"http://schemas.microsoft.com/developer/msbuild/2003\">
    <PropertyGroup>
        <MainSource>App.dpr</MainSource>
        <FrameworkType>VCL</FrameworkType>
        <Base>True</Base>
    </PropertyGroup>
    <ItemGroup>
        <BuildConfiguration Include=\"Base\">
            <Key>Base</Key>
        </BuildConfiguration>
        <DCCReference Include=\"units\\Zeta.pas\">
            <BuildOrder>3</BuildOrder>
        </DCCReference>
        <DCCReference Include=\"units\\alpha.pas\">
            <BuildOrder>1</BuildOrder>
        </DCCReference>
        <DelphiCompile Include=\"App.dpr\">
            <BuildOrder>0</BuildOrder>
            <MainSource>MainSource</MainSource>
        </DelphiCompile>
    </ItemGroup>
    <ProjectExtensions>
        <Deployment Version=\"3\">
            <DeployFile LocalName=\"App.exe\" Configuration=\"Debug\" Class=\"ProjectOutput\"/>
            <DeployClass Name=\"AdditionalDebugSymbols\"/>
        </Deployment>
    </ProjectExtensions>
</Project>
";

const TIDIED: &str = "\u{feff}<?xml version=\"1.0\" encoding=\"utf-8\"?>
<Project xmlns=\"http://schemas.microsoft.com/developer/msbuild/2003\">
    <PropertyGroup>
        <Base>True</Base>
        <FrameworkType>VCL</FrameworkType>
        <MainSource>App.dpr</MainSource>
    </PropertyGroup>
    <ItemGroup>
        <DelphiCompile Include=\"App.dpr\">
            <BuildOrder>0</BuildOrder>
            <MainSource>MainSource</MainSource>
        </DelphiCompile>
        <BuildConfiguration Include=\"Base\">
            <Key>Base</Key>
        </BuildConfiguration>
        <DCCReference Include=\"units\\Zeta.pas\">
            <BuildOrder>3</BuildOrder>
            <!--after units\\alpha.pas-->
        </DCCReference>
        <DCCReference Include=\"units\\alpha.pas\">
            <BuildOrder>1</BuildOrder>
            <!--after App.dpr-->
        </DCCReference>
    </ItemGroup>
    <ProjectExtensions>
        <Deployment Version=\"3\">
            <DeployClass Name=\"AdditionalDebugSymbols\"/>
            <DeployFile LocalName=\"App.exe\" Configuration=\"Debug\" Class=\"ProjectOutput\"/>
        </Deployment>
    </ProjectExtensions>
</Project>
";

#[test]
fn tidy_to_output_file_leaves_input_alone() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("App.dproj");
    let output = dir.path().join("App.tidy.dproj");
    fs::write(&input, PROJECT).unwrap();

    let result = tidy_file(&input, Some(&output), &Defaults::default()).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), TIDIED);
    assert_eq!(fs::read_to_string(&input).unwrap(), PROJECT);
    assert!(result.changed);
    assert_eq!(result.stats.build_order_comments, 2);
    assert_eq!(result.stats.deployments, 1);
}

#[test]
fn tidy_without_output_returns_content() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("App.dproj");
    fs::write(&input, PROJECT).unwrap();

    let result = tidy_file(&input, None, &Defaults::default()).unwrap();

    assert_eq!(String::from_utf8(result.content).unwrap(), TIDIED);
    assert!(result.output.is_none());
    assert_eq!(fs::read_to_string(&input).unwrap(), PROJECT);
}

#[test]
fn tidy_in_place_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("App.dproj");
    fs::write(&input, PROJECT).unwrap();

    tidy_file(&input, Some(&input), &Defaults::default()).unwrap();
    let result = tidy_file(&input, Some(&input), &Defaults::default()).unwrap();

    assert!(!result.changed);
    assert_eq!(fs::read_to_string(&input).unwrap(), TIDIED);
}

#[test]
fn tidy_reports_malformed_xml() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Broken.dproj");
    fs::write(&input, "<Project><ItemGroup></Project>").unwrap();

    let err = tidy_file(&input, None, &Defaults::default()).unwrap_err();

    assert_eq!(err.code.as_str(), "xml.parse_failed");
}

#[test]
fn tidy_reports_missing_input() {
    let dir = TempDir::new().unwrap();

    let err = tidy_file(&dir.path().join("Nope.dproj"), None, &Defaults::default()).unwrap_err();

    assert_eq!(err.code.as_str(), "file.access_failed");
}
