use std::sync::Arc;

use serde_json::json;
use stratus_core::{Function, Properties, Template, TemplateError, Value};
use stratus_schema::{SchemaSource, compile};

fn schema() -> Arc<stratus_core::Schema> {
    let source: SchemaSource = serde_json::from_value(json!({
        "Resources": {
            "AWS::EC2::Instance": {
                "Properties": {
                    "ImageId": "String",
                    "InstanceType": "String",
                    "SecurityGroupIds": ["String"],
                    "BlockDeviceMappings": ["BlockDeviceMapping"],
                    "Tags": ["Tag"]
                }
            },
            "AWS::EC2::SecurityGroup": {
                "Properties": { "GroupDescription": "String", "VpcId": "String" }
            },
            "AWS::RDS::DBSecurityGroup": {
                "Properties": { "GroupDescription": "String" }
            },
            "NS1::Foo::Widget": {},
            "NS2::Bar::Widget": {}
        },
        "Types": {
            "Tag": { "Key": "String", "Value": "String" },
            "BlockDeviceMapping": { "DeviceName": "String", "Ebs": "EbsBlockDevice" },
            "EbsBlockDevice": { "VolumeSize": "Integer", "DeleteOnTermination": "Boolean" }
        }
    }))
    .unwrap();
    Arc::new(compile(&source).unwrap())
}

#[test]
fn test_widget_short_form_is_ambiguous() {
    let mut template = Template::new(schema());

    assert!(template.declare("Foo::Widget", "A").is_ok());
    assert!(template.declare("Bar::Widget", "B").is_ok());
    assert!(template.declare("NS1::Foo::Widget", "C").is_ok());
    assert!(matches!(
        template.declare("Widget", "D"),
        Err(TemplateError::AmbiguousResourceType { .. })
    ));
}

#[test]
fn test_nested_defaults_follow_the_schema() {
    let mut template = Template::new(schema());
    template
        .declare_with("Instance", "Web", |web| {
            web.set("ImageId", Function::find_in_map("Amis", Function::reference("AWS::Region"), "Ami"))?;
            web.push_with("block_device_mapping", |mapping| {
                mapping.set("DeviceName", "/dev/xvda")?;
                mapping.configure("Ebs", |ebs| {
                    *ebs.property("volume_size")? = Value::from(20);
                    ebs.property("DeleteOnTermination")?;
                    Ok(())
                })?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    let json = serde_json::to_value(&template).unwrap();
    assert_eq!(
        json["Resources"]["Web"]["Properties"]["BlockDeviceMappings"],
        json!([{
            "DeviceName": "/dev/xvda",
            "Ebs": { "VolumeSize": 20, "DeleteOnTermination": false }
        }])
    );
    assert_eq!(template.check_refs(), None);
}

#[test]
fn test_plural_accessor_keeps_appended_elements() {
    let mut template = Template::new(schema());
    let web = template.declare("EC2::Instance", "Web").unwrap();
    web.list_or("SecurityGroupIds", vec![Value::from("sg-1")]).unwrap();
    web.push("security_group_id", Function::reference("Sg")).unwrap();
    web.push("SecurityGroupId", "sg-3").unwrap();

    assert_eq!(web.list("security_group_ids").unwrap().len(), 3);
    assert_eq!(web.list_or("SecurityGroupIds", Vec::new()).unwrap().len(), 3);
}

#[test]
fn test_cycle_between_declared_resources() {
    let mut template = Template::new(schema());
    template
        .declare_with("EC2::SecurityGroup", "Sg", |sg| {
            sg.set("GroupDescription", Function::get_att("Web", "PrivateIp"))?;
            Ok(())
        })
        .unwrap();
    template
        .declare_with("Instance", "Web", |web| {
            web.push("SecurityGroupId", Function::reference("Sg"))?;
            Ok(())
        })
        .unwrap();
    template
        .output("WebIp")
        .set_value(Function::get_att("Web", "PrivateIp"));
    template.output("Missing").set_value(Function::reference("Nope"));

    let messages = template.check_refs().unwrap();
    assert_eq!(
        messages,
        vec![
            "Invalid Reference: Resource Sg refers to Web",
            "Invalid Reference: Resource Web refers to Sg",
            "Invalid Reference: Output Missing refers to Nope",
        ]
    );
}
